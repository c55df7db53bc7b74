//! Coverage tiers and their decoration sets

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Coverage bucket used to pick a decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// coverage < 50
    Low,
    /// 50 <= coverage < 80
    Mid,
    /// coverage >= 80
    High,
}

const HIGH: &[&str] = &[
    "https://media3.giphy.com/media/v1.Y2lkPTc5MGI3NjExNTVoMnViNDQ2MWViYnJpeDIycnNnNHZoeDFjdXd6Znk4aGY4dWt0NCZlcD12MV9pbnRlcm5hbF9naWZfYnlfaWQmY3Q9Zw/NUwoRZzHc2Bws/giphy.gif",
    "https://media1.giphy.com/media/v1.Y2lkPTc5MGI3NjExbjlsbjBpbjQ4eDBsdnNncmFlZ3lzY3Rta21mZ3A1MnUzYWdvdTR1cCZlcD12MV9pbnRlcm5hbF9naWZfYnlfaWQmY3Q9Zw/TJrS7r0f6SOthGTiPe/giphy.gif",
    "https://media4.giphy.com/media/v1.Y2lkPTc5MGI3NjExbHR1c2VtcGY5aGhrN3JweG52bWN1eGNzN3lwNnl1ZHFra2JjeGpyZiZlcD12MV9pbnRlcm5hbF9naWZfYnlfaWQmY3Q9Zw/8rFNes6jllJQRnHTsF/giphy.gif",
    "https://media4.giphy.com/media/v1.Y2lkPTc5MGI3NjExY2k0dnh4OTJ2ZG10aXQ4cjFnaTFwM3NmNjJsb2xnNzZ1cDRhYWNzZCZlcD12MV9pbnRlcm5hbF9naWZfYnlfaWQmY3Q9Zw/hv4TC2Ide8rDoXy0iK/giphy.gif",
    "https://media0.giphy.com/media/v1.Y2lkPTc5MGI3NjExanFxZDJ6NnIxcTZwcjRtNmx3azZrczdxbWZ2azc3cWJxZWo2cnM3MSZlcD12MV9pbnRlcm5hbF9naWZfYnlfaWQmY3Q9Zw/kC9Kveaw468cPLxpYE/giphy.gif",
];

const MID: &[&str] = &[
    "https://media0.giphy.com/media/v1.Y2lkPTc5MGI3NjExMWl1NTV0cDBrcGIwMGFiajU5dmMybzRodTlnbWF1NXI4ZnN3Nnh5MSZlcD12MV9pbnRlcm5hbF9naWZfYnlfaWQmY3Q9Zw/TzFul3viUIjMBCpDxb/giphy.gif",
    "https://media1.giphy.com/media/v1.Y2lkPTc5MGI3NjExZnU5Y28xZ3ZsaTc2bWdwYnNiYW11czk1MTl1MjdpbWpwbHdlbDFycSZlcD12MV9pbnRlcm5hbF9naWZfYnlfaWQmY3Q9Zw/Uiw3z8GpHgHmYRHlSI/giphy.gif",
    "https://media1.giphy.com/media/v1.Y2lkPTc5MGI3NjExd2IxemU1Y3htNWZueHlvZmRqNTNtdXV6bTgxbDBuY3o3ZW83ZzdmOSZlcD12MV9pbnRlcm5hbF9naWZfYnlfaWQmY3Q9Zw/SsScqzkuGaEqVDJtVJ/giphy.gif",
];

const LOW: &[&str] = &[
    "https://media1.giphy.com/media/v1.Y2lkPTc5MGI3NjExZ3J2dmNxYjl4anE5cHlrMGFjaXVueXlpdGxkeWFwNGc4aW1lNWVzNyZlcD12MV9pbnRlcm5hbF9naWZfYnlfaWQmY3Q9Zw/l3q2A93zxqHnFDkuQ/giphy.gif",
    "https://media3.giphy.com/media/v1.Y2lkPTc5MGI3NjExbzIyOG9iejk2cWxvNXp4aHBrbTRjcjNtcjJyOXRoa2ptdXZxcTZ5MiZlcD12MV9pbnRlcm5hbF9naWZfYnlfaWQmY3Q9Zw/WnMOl2Ogz2x35sPJMk/giphy.gif",
];

impl Tier {
    /// Bucket a coverage percentage. Boundaries belong to the upper tier.
    pub fn for_coverage(percent: f64) -> Self {
        if percent < 50.0 {
            Tier::Low
        } else if percent < 80.0 {
            Tier::Mid
        } else {
            Tier::High
        }
    }

    /// Fixed decoration set for this tier. Never empty.
    pub fn decorations(self) -> &'static [&'static str] {
        match self {
            Tier::Low => LOW,
            Tier::Mid => MID,
            Tier::High => HIGH,
        }
    }

    /// Pick one decoration uniformly at random.
    pub fn choose_decoration<R: Rng + ?Sized>(self, rng: &mut R) -> &'static str {
        let set = self.decorations();
        set.choose(rng).copied().unwrap_or(set[0])
    }

    /// Tier that owns a decoration URL, if any.
    pub fn of_decoration(url: &str) -> Option<Self> {
        [Tier::Low, Tier::Mid, Tier::High]
            .into_iter()
            .find(|tier| tier.decorations().contains(&url))
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tier::Low => "low",
            Tier::Mid => "mid",
            Tier::High => "high",
        };
        write!(f, "{}", name)
    }
}
