//! Parser for the upstream catalogue document.
//!
//! The source of truth is a loosely-structured text document maintained by
//! hand, so the parser is defensive: malformed lines are rejected and
//! logged, never silently dropped, and an empty result is a configuration
//! error rather than an empty table.
//!
//! Format:
//!
//! ```text
//! # comment
//! [mythic]
//! mythic_cavendish 0.000001 Cavendish
//! [special]
//! special_eltobito 0.00001 eltobito
//! [pool]
//! common stone Stone
//! rare rare_mcplayhd McPlayHD
//! ```
//!
//! `[mythic]`/`[special]` entries are `id chance display-name`; `[pool]`
//! entries are `tier id display-name` (the pool is unweighted).

use tracing::warn;

use crate::error::{WheelError, WheelResult};
use crate::rarity::{Entity, RarityTable, Tier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Mythic,
    Special,
    Pool,
}

/// Parse a catalogue document into a validated table.
pub fn parse(doc: &str, generation: u64) -> WheelResult<RarityTable> {
    let mut mythics = Vec::new();
    let mut specials = Vec::new();
    let mut pool = Vec::new();
    let mut section: Option<Section> = None;
    let mut rejected = 0usize;

    for (lineno, raw) in doc.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = match header {
                "mythic" => Some(Section::Mythic),
                "special" => Some(Section::Special),
                "pool" => Some(Section::Pool),
                other => {
                    warn!(line = lineno + 1, header = other, "unknown catalogue section");
                    rejected += 1;
                    None
                }
            };
            continue;
        }

        let Some(section) = section else {
            warn!(line = lineno + 1, "catalogue entry before any section header");
            rejected += 1;
            continue;
        };

        match parse_entry(section, line) {
            Some(entity) => match section {
                Section::Mythic => mythics.push(entity),
                Section::Special => specials.push(entity),
                Section::Pool => pool.push(entity),
            },
            None => {
                warn!(line = lineno + 1, entry = line, "malformed catalogue entry");
                rejected += 1;
            }
        }
    }

    if mythics.is_empty() && specials.is_empty() && pool.is_empty() {
        return Err(WheelError::Configuration(format!(
            "catalogue document produced no entries ({rejected} rejected)"
        )));
    }
    if rejected > 0 {
        warn!(rejected, "catalogue parsed with rejected entries");
    }

    RarityTable::from_parts(generation, mythics, specials, pool)
}

fn parse_entry(section: Section, line: &str) -> Option<Entity> {
    let mut parts = line.splitn(3, char::is_whitespace);
    match section {
        Section::Mythic | Section::Special => {
            let id = parts.next()?.to_string();
            let chance: f64 = parts.next()?.parse().ok()?;
            let name = parts.next().unwrap_or(&id).trim().to_string();
            let tier = if section == Section::Mythic {
                Tier::Mythic
            } else {
                Tier::Special
            };
            Some(Entity {
                id,
                name,
                tier,
                chance,
                special_roster: true,
            })
        }
        Section::Pool => {
            let tier = match parts.next()? {
                "common" => Tier::Common,
                "rare" => Tier::Rare,
                "legendary" => Tier::Legendary,
                _ => return None,
            };
            let id = parts.next()?.to_string();
            let name = parts.next().unwrap_or(&id).trim().to_string();
            Some(Entity {
                id,
                name,
                tier,
                chance: 0.0,
                special_roster: false,
            })
        }
    }
}

/// Built-in reference catalogue: the fixed mythic and special rosters plus
/// a small item pool. Used when the upstream document is unreachable.
pub const FALLBACK_CATALOGUE: &str = r#"
# Reference catalogue. The live document is fetched from upstream;
# this copy only exists so the engine can run without it.

[mythic]
mythic_cavendish 0.000001 Cavendish
mythic_jimbo 0.000005 Jimbo

[special]
special_eltobito 0.00001 eltobito
special_apppaa 0.0001 apppaa
special_threeseconds 0.0003 threeseconds
special_ch0rd 0.0004 CH0RD
special_stupxd 0.0005 stupxd
rare_shabana02 0.0007 shabana02
rare_mcplayhd 0.00067 McPlayHD
rare_owen1212055 0.0006 Owen1212055
rare_170yt 0.00069 170yt
rare_bastighg 0.0006 BastiGHG
rare_lennraz 0.00072 LennraZ
rare_nubpanda 0.0007 NubPanda
rare_johnlongears 0.00068 Johnlongears
rare_steez 0.00062 steez

[pool]
common stone Stone
common oak_log Oak Log
common wheat Wheat
common cobblestone Cobblestone
common sugar_cane Sugar Cane
common iron_ingot Iron Ingot
rare diamond_block Diamond Block
rare ender_pearl Ender Pearl
rare golden_apple Golden Apple
rare ancient_debris Ancient Debris
legendary beacon Beacon
legendary dragon_egg Dragon Egg
legendary elytra Elytra
"#;
