//! Codec for in-game chat links (`[&AgH1WQAA]`).
//!
//! A link is a base64 payload: one type byte followed by a little-endian
//! body. Coin links carry a copper amount; item links carry a count, a
//! 24-bit item id, a presence-flag byte and the optional skin/upgrade
//! ids it announces; the remaining types carry a bare id.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Error, Result};

const TYPE_COIN: u8 = 1;
const TYPE_ITEM: u8 = 2;
const TYPE_TEXT: u8 = 3;
const TYPE_MAP: u8 = 4;
const TYPE_SKILL: u8 = 6;
const TYPE_TRAIT: u8 = 7;
const TYPE_RECIPE: u8 = 9;
const TYPE_SKIN: u8 = 10;
const TYPE_OUTFIT: u8 = 11;

const FLAG_SKIN: u8 = 0x80;
const FLAG_UPGRADE_1: u8 = 0x40;
const FLAG_UPGRADE_2: u8 = 0x20;

/// A decoded chat link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatLink {
    /// An amount of coins, in copper.
    Coin { amount: u32 },
    /// An item stack, optionally skinned and upgraded.
    Item {
        id: u32,
        count: u8,
        skin: Option<u32>,
        upgrade1: Option<u32>,
        upgrade2: Option<u32>,
    },
    Text { id: u32 },
    Map { id: u32 },
    Skill { id: u32 },
    Trait { id: u32 },
    Recipe { id: u32 },
    Skin { id: u32 },
    Outfit { id: u32 },
}

impl ChatLink {
    /// Coin link from denominations: 1 gold = 100 silver = 10 000 copper.
    pub fn coins(gold: u32, silver: u32, copper: u32) -> Self {
        ChatLink::Coin {
            amount: gold * 100 * 100 + silver * 100 + copper,
        }
    }

    /// A single unmodified item.
    pub fn item(id: u32) -> Self {
        ChatLink::Item {
            id,
            count: 1,
            skin: None,
            upgrade1: None,
            upgrade2: None,
        }
    }

    pub fn encode(&self) -> String {
        let mut data = Vec::with_capacity(17);
        match *self {
            ChatLink::Coin { amount } => push_id(&mut data, TYPE_COIN, amount),
            ChatLink::Item {
                id,
                count,
                skin,
                upgrade1,
                upgrade2,
            } => {
                data.push(TYPE_ITEM);
                data.push(count);
                let mut flagged = id & 0x00FF_FFFF;
                let mut extras = Vec::with_capacity(3);
                for (flag, value) in [
                    (FLAG_SKIN, skin),
                    (FLAG_UPGRADE_1, upgrade1),
                    (FLAG_UPGRADE_2, upgrade2),
                ] {
                    if let Some(value) = value {
                        flagged |= u32::from(flag) << 24;
                        extras.push(value);
                    }
                }
                data.extend_from_slice(&flagged.to_le_bytes());
                for value in extras {
                    data.extend_from_slice(&value.to_le_bytes());
                }
            }
            ChatLink::Text { id } => push_id(&mut data, TYPE_TEXT, id),
            ChatLink::Map { id } => push_id(&mut data, TYPE_MAP, id),
            ChatLink::Skill { id } => push_id(&mut data, TYPE_SKILL, id),
            ChatLink::Trait { id } => push_id(&mut data, TYPE_TRAIT, id),
            ChatLink::Recipe { id } => push_id(&mut data, TYPE_RECIPE, id),
            ChatLink::Skin { id } => push_id(&mut data, TYPE_SKIN, id),
            ChatLink::Outfit { id } => push_id(&mut data, TYPE_OUTFIT, id),
        }
        format!("[&{}]", STANDARD.encode(&data))
    }

    /// Decode a chat link. The `[&`…`]` wrapper is optional.
    pub fn decode(link: &str) -> Result<Self> {
        let body = link
            .strip_prefix("[&")
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(link);
        let data = STANDARD
            .decode(body)
            .map_err(|err| Error::ChatLink(err.to_string()))?;
        let (&link_type, rest) = data
            .split_first()
            .ok_or_else(|| Error::ChatLink("empty payload".into()))?;

        match link_type {
            TYPE_COIN => Ok(ChatLink::Coin {
                amount: read_u32(rest, 0)?,
            }),
            TYPE_ITEM => {
                let (&count, rest) = rest
                    .split_first()
                    .ok_or_else(|| Error::ChatLink("truncated item payload".into()))?;
                let raw = read_u32(rest, 0)?;
                let flags = (raw >> 24) as u8;
                let id = raw & 0x00FF_FFFF;

                let mut offset = 4;
                let mut take = |flag: u8| -> Result<Option<u32>> {
                    if flags & flag == 0 {
                        return Ok(None);
                    }
                    let value = read_u32(rest, offset)?;
                    offset += 4;
                    Ok(Some(value))
                };
                let skin = take(FLAG_SKIN)?;
                let upgrade1 = take(FLAG_UPGRADE_1)?;
                let upgrade2 = take(FLAG_UPGRADE_2)?;

                Ok(ChatLink::Item {
                    id,
                    count,
                    skin,
                    upgrade1,
                    upgrade2,
                })
            }
            TYPE_TEXT => Ok(ChatLink::Text {
                id: read_u32(rest, 0)?,
            }),
            TYPE_MAP => Ok(ChatLink::Map {
                id: read_u32(rest, 0)?,
            }),
            TYPE_SKILL => Ok(ChatLink::Skill {
                id: read_u32(rest, 0)?,
            }),
            TYPE_TRAIT => Ok(ChatLink::Trait {
                id: read_u32(rest, 0)?,
            }),
            TYPE_RECIPE => Ok(ChatLink::Recipe {
                id: read_u32(rest, 0)?,
            }),
            TYPE_SKIN => Ok(ChatLink::Skin {
                id: read_u32(rest, 0)?,
            }),
            TYPE_OUTFIT => Ok(ChatLink::Outfit {
                id: read_u32(rest, 0)?,
            }),
            other => Err(Error::UnknownLinkType(other)),
        }
    }
}

fn push_id(data: &mut Vec<u8>, link_type: u8, id: u32) {
    data.push(link_type);
    data.extend_from_slice(&id.to_le_bytes());
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    let bytes: [u8; 4] = data
        .get(offset..offset + 4)
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| Error::ChatLink("truncated payload".into()))?;
    Ok(u32::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coin_denominations_pack_base_100() {
        assert_eq!(ChatLink::coins(1, 2, 3), ChatLink::Coin { amount: 10203 });
        assert_eq!(
            ChatLink::coins(1, 2, 3).encode(),
            ChatLink::Coin { amount: 10203 }.encode()
        );
    }

    #[test]
    fn coin_link_encodes_to_known_form() {
        assert_eq!(ChatLink::Coin { amount: 10203 }.encode(), "[&AdsnAAA=]");
    }

    #[test]
    fn coin_link_roundtrip() {
        let link = ChatLink::coins(0, 3, 92);
        assert_eq!(ChatLink::decode(&link.encode()).unwrap(), link);
    }

    #[test]
    fn item_roundtrip_with_upgrades() {
        let link = ChatLink::Item {
            id: 46762,
            count: 1,
            skin: Some(3709),
            upgrade1: Some(24554),
            upgrade2: None,
        };
        let encoded = link.encode();
        assert_eq!(ChatLink::decode(&encoded).unwrap(), link);
    }

    #[test]
    fn plain_item_has_no_extras() {
        let encoded = ChatLink::item(23029).encode();
        match ChatLink::decode(&encoded).unwrap() {
            ChatLink::Item {
                id,
                count,
                skin,
                upgrade1,
                upgrade2,
            } => {
                assert_eq!(id, 23029);
                assert_eq!(count, 1);
                assert_eq!((skin, upgrade1, upgrade2), (None, None, None));
            }
            other => panic!("expected item link, got {other:?}"),
        }
    }

    #[test]
    fn wrapper_is_optional_on_decode() {
        let wrapped = ChatLink::Map { id: 825 }.encode();
        let bare = wrapped.trim_start_matches("[&").trim_end_matches(']');
        assert_eq!(
            ChatLink::decode(bare).unwrap(),
            ChatLink::decode(&wrapped).unwrap()
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        // Type byte 5 is unassigned.
        match ChatLink::decode("[&BQAAAAA=]") {
            Err(Error::UnknownLinkType(5)) => {}
            other => panic!("expected UnknownLinkType(5), got {other:?}"),
        }
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            ChatLink::decode("[&not base64!]"),
            Err(Error::ChatLink(_))
        ));
        assert!(matches!(
            ChatLink::decode("[&AQ==]"),
            Err(Error::ChatLink(_))
        ));
    }
}
