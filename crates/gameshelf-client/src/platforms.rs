//! Platform catalog and display heuristics
//!
//! IGDB reports the same hardware under several names ("Super Famicom",
//! "SNES", "Super Nintendo Entertainment System"). The helpers here fold
//! those spellings together and derive badge colors and short labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platforms the user can mark as owned, keyed by IGDB platform id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum IgdbPlatform {
    Pc,
    PlayStation5,
    PlayStation4,
    XboxSeries,
    XboxOne,
    NintendoSwitch,
    PlayStation3,
    Xbox360,
    Wii,
    WiiU,
    Nintendo3ds,
    PlayStationVita,
    Nintendo64,
    SuperNintendo,
    PlayStation1,
    PlayStation2,
    Dreamcast,
    GameBoyAdvance,
    GameBoy,
    GameBoyColor,
    Nes,
    SegaGenesis,
    SegaSaturn,
    Atari2600,
    NeoGeo,
}

impl IgdbPlatform {
    /// Every platform, current generation first
    pub fn all() -> &'static [IgdbPlatform] {
        use IgdbPlatform::*;
        &[
            Pc,
            PlayStation5,
            PlayStation4,
            XboxSeries,
            XboxOne,
            NintendoSwitch,
            PlayStation3,
            Xbox360,
            Wii,
            WiiU,
            Nintendo3ds,
            PlayStationVita,
            Nintendo64,
            SuperNintendo,
            PlayStation1,
            PlayStation2,
            Dreamcast,
            GameBoyAdvance,
            GameBoy,
            GameBoyColor,
            Nes,
            SegaGenesis,
            SegaSaturn,
            Atari2600,
            NeoGeo,
        ]
    }

    /// IGDB platform id
    pub fn id(self) -> i64 {
        match self {
            IgdbPlatform::Pc => 6,
            IgdbPlatform::PlayStation5 => 167,
            IgdbPlatform::PlayStation4 => 48,
            IgdbPlatform::XboxSeries => 169,
            IgdbPlatform::XboxOne => 49,
            IgdbPlatform::NintendoSwitch => 130,
            IgdbPlatform::PlayStation3 => 9,
            IgdbPlatform::Xbox360 => 12,
            IgdbPlatform::Wii => 5,
            IgdbPlatform::WiiU => 41,
            IgdbPlatform::Nintendo3ds => 37,
            IgdbPlatform::PlayStationVita => 46,
            IgdbPlatform::Nintendo64 => 4,
            IgdbPlatform::SuperNintendo => 19,
            IgdbPlatform::PlayStation1 => 7,
            IgdbPlatform::PlayStation2 => 8,
            IgdbPlatform::Dreamcast => 23,
            IgdbPlatform::GameBoyAdvance => 24,
            IgdbPlatform::GameBoy => 33,
            IgdbPlatform::GameBoyColor => 22,
            IgdbPlatform::Nes => 18,
            IgdbPlatform::SegaGenesis => 29,
            IgdbPlatform::SegaSaturn => 32,
            IgdbPlatform::Atari2600 => 59,
            IgdbPlatform::NeoGeo => 42,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.id() == id)
    }

    /// Display name used in pickers
    pub fn label(self) -> &'static str {
        match self {
            IgdbPlatform::Pc => "PC",
            IgdbPlatform::PlayStation5 => "PlayStation 5",
            IgdbPlatform::PlayStation4 => "PlayStation 4",
            IgdbPlatform::XboxSeries => "Xbox Series X|S",
            IgdbPlatform::XboxOne => "Xbox One",
            IgdbPlatform::NintendoSwitch => "Nintendo Switch",
            IgdbPlatform::PlayStation3 => "PlayStation 3",
            IgdbPlatform::Xbox360 => "Xbox 360",
            IgdbPlatform::Wii => "Nintendo Wii",
            IgdbPlatform::WiiU => "Nintendo Wii U",
            IgdbPlatform::Nintendo3ds => "Nintendo 3DS",
            IgdbPlatform::PlayStationVita => "PS Vita",
            IgdbPlatform::Nintendo64 => "Nintendo 64",
            IgdbPlatform::SuperNintendo => "Super Nintendo",
            IgdbPlatform::PlayStation1 => "PlayStation",
            IgdbPlatform::PlayStation2 => "PlayStation 2",
            IgdbPlatform::Dreamcast => "Dreamcast",
            IgdbPlatform::GameBoyAdvance => "Game Boy Advance",
            IgdbPlatform::GameBoy => "Game Boy",
            IgdbPlatform::GameBoyColor => "Game Boy Color",
            IgdbPlatform::Nes => "NES (Nintendo Entertainment System)",
            IgdbPlatform::SegaGenesis => "Sega Genesis / Mega Drive",
            IgdbPlatform::SegaSaturn => "Sega Saturn",
            IgdbPlatform::Atari2600 => "Atari 2600",
            IgdbPlatform::NeoGeo => "Neo Geo",
        }
    }

    pub fn manufacturer(self) -> PlatformManufacturer {
        use IgdbPlatform::*;
        match self {
            NintendoSwitch | Wii | WiiU | Nintendo3ds | Nintendo64 | SuperNintendo
            | GameBoyAdvance | GameBoy | GameBoyColor | Nes => PlatformManufacturer::Nintendo,
            PlayStation5 | PlayStation4 | PlayStation3 | PlayStation2 | PlayStation1
            | PlayStationVita => PlatformManufacturer::Sony,
            XboxSeries | XboxOne | Xbox360 => PlatformManufacturer::Microsoft,
            Dreamcast | SegaGenesis | SegaSaturn => PlatformManufacturer::Sega,
            Pc | Atari2600 | NeoGeo => PlatformManufacturer::Other,
        }
    }
}

impl fmt::Display for IgdbPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<IgdbPlatform> for i64 {
    fn from(platform: IgdbPlatform) -> Self {
        platform.id()
    }
}

impl TryFrom<i64> for IgdbPlatform {
    type Error = String;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        IgdbPlatform::from_id(id).ok_or_else(|| format!("Unknown platform id: {}", id))
    }
}

/// Label for a raw IGDB platform id
pub fn label_for_id(id: i64) -> String {
    match IgdbPlatform::from_id(id) {
        Some(platform) => platform.label().to_string(),
        None => format!("Platform {}", id),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformManufacturer {
    Nintendo,
    Sony,
    Microsoft,
    Sega,
    Other,
}

impl PlatformManufacturer {
    pub fn all() -> [PlatformManufacturer; 5] {
        [
            PlatformManufacturer::Nintendo,
            PlatformManufacturer::Sony,
            PlatformManufacturer::Microsoft,
            PlatformManufacturer::Sega,
            PlatformManufacturer::Other,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            PlatformManufacturer::Nintendo => "Nintendo",
            PlatformManufacturer::Sony => "Sony",
            PlatformManufacturer::Microsoft => "Microsoft",
            PlatformManufacturer::Sega => "Sega",
            PlatformManufacturer::Other => "Other",
        }
    }

    /// Brand color as a hex string
    pub fn color(self) -> &'static str {
        match self {
            PlatformManufacturer::Nintendo => "#E60012",
            PlatformManufacturer::Sony => "#0070CC",
            PlatformManufacturer::Microsoft => "#107C10",
            PlatformManufacturer::Sega => "#0089CF",
            PlatformManufacturer::Other => "#9CA3AF",
        }
    }

    /// Classify a free-text platform name
    ///
    /// Sega is checked before Nintendo: "Genesis" contains "nes".
    pub fn classify(name: &str) -> Self {
        let lower = name.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

        if has(&["playstation", "vita", "psp"]) || lower.starts_with("ps") {
            PlatformManufacturer::Sony
        } else if has(&["xbox"]) {
            PlatformManufacturer::Microsoft
        } else if has(&["sega", "dreamcast", "genesis", "mega drive", "saturn", "game gear"]) {
            PlatformManufacturer::Sega
        } else if has(&[
            "nintendo", "switch", "wii", "game boy", "gamecube", "famicom", "nes", "3ds", "n64",
        ]) {
            PlatformManufacturer::Nintendo
        } else {
            PlatformManufacturer::Other
        }
    }
}

/// Platforms grouped by manufacturer, one non-empty group per manufacturer
pub fn platforms_by_manufacturer() -> Vec<(PlatformManufacturer, Vec<IgdbPlatform>)> {
    PlatformManufacturer::all()
        .into_iter()
        .map(|manufacturer| {
            let platforms = IgdbPlatform::all()
                .iter()
                .copied()
                .filter(|p| p.manufacturer() == manufacturer)
                .collect();
            (manufacturer, platforms)
        })
        .collect()
}

/// Fold spelling variants into one canonical platform name
pub fn normalize_platform_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();

    if lower.contains("super famicom")
        || lower.contains("super nintendo")
        || lower.contains("super nes")
        || lower == "snes"
    {
        "Super Nintendo".to_string()
    } else if lower == "nes" || lower == "famicom" || lower.contains("nintendo entertainment system")
    {
        "NES".to_string()
    } else if lower.contains("genesis") || lower.contains("mega drive") {
        "Genesis".to_string()
    } else {
        name.to_string()
    }
}

/// Badge color for a free-text platform name
pub fn platform_color(name: &str) -> &'static str {
    PlatformManufacturer::classify(name).color()
}

/// Short badge label for a free-text platform name
///
/// Falls back to the first three characters upper-cased.
pub fn platform_short_name(name: &str) -> String {
    let lower = name.to_lowercase();
    let has = |needle: &str| lower.contains(needle);

    let short = if has("playstation 5") || lower == "ps5" {
        "PS5"
    } else if has("playstation 4") || lower == "ps4" {
        "PS4"
    } else if has("playstation 3") || lower == "ps3" {
        "PS3"
    } else if has("playstation 2") || lower == "ps2" {
        "PS2"
    } else if has("vita") {
        "VITA"
    } else if has("portable") || lower == "psp" {
        "PSP"
    } else if has("playstation") {
        "PSX"
    } else if has("xbox series") {
        "XSX"
    } else if has("xbox one") {
        "XB1"
    } else if has("xbox 360") {
        "360"
    } else if has("xbox") {
        "XBOX"
    } else if has("switch") {
        "NSW"
    } else if has("wii u") {
        "WiiU"
    } else if has("wii") {
        "Wii"
    } else if has("nintendo 64") {
        "N64"
    } else if has("super nintendo") || has("super famicom") || lower == "snes" {
        "SNES"
    } else if has("game boy advance") {
        "GBA"
    } else if has("game boy color") {
        "GBC"
    } else if has("game boy") {
        "GB"
    } else if has("3ds") {
        "3DS"
    } else if has("nintendo ds") {
        "NDS"
    } else if has("gamecube") {
        "GC"
    } else if has("dreamcast") {
        "DC"
    } else if has("genesis") || has("mega drive") {
        "GEN"
    } else if has("saturn") {
        "SAT"
    } else if lower == "nes" || has("nintendo entertainment system") || lower == "famicom" {
        "NES"
    } else if lower == "pc" || has("windows") {
        "PC"
    } else {
        return name.chars().take(3).collect::<String>().to_uppercase();
    };

    short.to_string()
}

/// Normalize names and drop duplicates, keeping first-seen order
pub fn unique_platforms<S: AsRef<str>>(platforms: &[S]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for platform in platforms {
        let normalized = normalize_platform_name(platform.as_ref());
        if !unique.contains(&normalized) {
            unique.push(normalized);
        }
    }
    unique
}
