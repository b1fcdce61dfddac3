use rand::Rng;
use rand::seq::IndexedRandom;

/// The cosmetic dressing of one explanation: what we count and where we put
/// it.
///
/// A theme is rolled once per generated sequence, so every step of one
/// explanation talks about the same objects. The next request rolls again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    name: &'static str,
    plural: &'static str,
    icon: &'static str,
    container: &'static str,
    container_plural: &'static str,
}

/// The fixed table of object themes explanations draw from.
pub const THEMES: [Theme; 5] = [
    Theme {
        name: "apple",
        plural: "apples",
        icon: "🍎",
        container: "basket",
        container_plural: "baskets",
    },
    Theme {
        name: "duck",
        plural: "ducks",
        icon: "🦆",
        container: "pond",
        container_plural: "ponds",
    },
    Theme {
        name: "car",
        plural: "cars",
        icon: "🚗",
        container: "box",
        container_plural: "boxes",
    },
    Theme {
        name: "cookie",
        plural: "cookies",
        icon: "🍪",
        container: "jar",
        container_plural: "jars",
    },
    Theme {
        name: "cat",
        plural: "cats",
        icon: "🐱",
        container: "mat",
        container_plural: "mats",
    },
];

impl Theme {
    /// Picks a theme uniformly at random.
    #[must_use]
    pub fn pick(rng: &mut impl Rng) -> Theme {
        *THEMES.choose(rng).unwrap_or(&THEMES[0])
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn plural(&self) -> &'static str {
        self.plural
    }

    #[must_use]
    pub fn icon(&self) -> &'static str {
        self.icon
    }

    #[must_use]
    pub fn container(&self) -> &'static str {
        self.container
    }

    #[must_use]
    pub fn container_plural(&self) -> &'static str {
        self.container_plural
    }

    /// Count-aware object phrase: `1 apple`, `3 apples`.
    #[must_use]
    pub fn counted(&self, count: u32) -> String {
        if count == 1 {
            format!("1 {}", self.name)
        } else {
            format!("{count} {}", self.plural)
        }
    }

    /// Count-aware container phrase: `1 basket`, `3 baskets`.
    #[must_use]
    pub fn counted_containers(&self, count: u32) -> String {
        if count == 1 {
            format!("1 {}", self.container)
        } else {
            format!("{count} {}", self.container_plural)
        }
    }
}
