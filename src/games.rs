//! Supported marketplaces
//!
//! Each game has its own app id, inventory context, and tracked item list.

/// A supported game marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Game {
    pub key: &'static str,
    pub name: &'static str,
    pub app_id: u32,
    pub context_id: u32,
    /// Items refreshed by the fetch loop
    pub items: &'static [&'static str],
}

static RUST_ITEMS: &[&str] = &[
    "Tempered AK47",
    "Big Grin Mask",
    "Blackout Hoodie",
    "Alien Red",
    "No Mercy AR",
    "Whiteout Pants",
    "Whiteout Hoodie",
    "Tempered Mask",
    "Tempered MP5",
    "Horror Bag",
    "Blackout Pants",
    "Whiteout Facemask",
    "Tempered LR300",
    "Tempered Chest Plate",
    "Rainbow Pony Hoodie",
    "Glory AK47",
    "Tempered Thompson",
    "No Mercy Hoodie",
    "Ghost Halloween Hoodie",
    "Tempered Door",
    "Tempered SAR",
    "Creepy Clown Hoodie",
    "Black Gold AK47",
    "Rainbow Pony Pants",
    "Black Gold MP5",
    "Cold Hunter AK47",
    "Black Gold Thompson",
    "Blackout Chest Plate",
    "Toxic Wolf Hoodie",
    "No Mercy Pants",
];

static CSGO_ITEMS: &[&str] = &[
    "AK-47 | Redline (Field-Tested)",
    "AK-47 | Asiimov (Field-Tested)",
    "AK-47 | Bloodsport (Minimal Wear)",
    "AK-47 | Neon Rider (Field-Tested)",
    "AWP | Asiimov (Field-Tested)",
    "AWP | Hyper Beast (Field-Tested)",
    "AWP | Neo-Noir (Field-Tested)",
    "M4A4 | Asiimov (Field-Tested)",
    "M4A4 | Desolate Space (Field-Tested)",
    "M4A1-S | Hyper Beast (Field-Tested)",
    "M4A1-S | Cyrex (Field-Tested)",
    "Desert Eagle | Code Red (Field-Tested)",
    "USP-S | Kill Confirmed (Field-Tested)",
    "USP-S | Printstream (Field-Tested)",
    "Operation Riptide Case",
    "Dreams & Nightmares Case",
    "Revolution Case",
    "Kilowatt Case",
];

static DOTA2_ITEMS: &[&str] = &[
    "Exalted Fractal Horns of Inner Abysm",
    "Exalted Bladeform Legacy",
    "Exalted Manifold Paradox",
    "Exalted Frost Avalanche",
    "Golden Profane Union",
    "Golden Atomic Ray Thrusters",
    "Fractal Horns of Inner Abysm",
    "Compass of the Rising Gale",
    "Demon Eater",
    "Dragonclaw Hook",
    "Unusual Baby Roshan",
    "Genuine Shagbark",
    "Treasure of the Crimson Witness 2023",
    "The International 2023 Collector's Cache",
];

static GAMES: &[Game] = &[
    Game {
        key: "rust",
        name: "Rust",
        app_id: 252490,
        context_id: 2,
        items: RUST_ITEMS,
    },
    Game {
        key: "csgo",
        name: "CS:GO",
        app_id: 730,
        context_id: 2,
        items: CSGO_ITEMS,
    },
    Game {
        key: "dota2",
        name: "Dota 2",
        app_id: 570,
        context_id: 2,
        items: DOTA2_ITEMS,
    },
];

/// All supported games
pub fn all() -> &'static [Game] {
    GAMES
}

/// Look up a game by its key (case-insensitive)
pub fn get(name: &str) -> Option<&'static Game> {
    let key = name.to_lowercase();
    GAMES.iter().find(|g| g.key == key)
}

/// Look up a game by Steam app id
pub fn by_app_id(app_id: u32) -> Option<&'static Game> {
    GAMES.iter().find(|g| g.app_id == app_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_known_games() {
        assert_eq!(get("rust").unwrap().app_id, 252490);
        assert_eq!(get("csgo").unwrap().app_id, 730);
        assert_eq!(get("dota2").unwrap().app_id, 570);
    }

    #[test]
    fn test_get_is_case_insensitive() {
        assert_eq!(get("Rust").unwrap().key, "rust");
        assert_eq!(get("CSGO").unwrap().key, "csgo");
    }

    #[test]
    fn test_get_unknown_game() {
        assert!(get("tf2").is_none());
    }

    #[test]
    fn test_by_app_id() {
        assert_eq!(by_app_id(570).unwrap().key, "dota2");
        assert!(by_app_id(440).is_none());
    }

    #[test]
    fn test_all_games_have_items() {
        for game in all() {
            assert!(!game.items.is_empty(), "{} has no tracked items", game.key);
        }
    }
}
