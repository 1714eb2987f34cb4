//! Heuristic genre classification.
//!
//! Free-text genre tags are messy ("Alternative & Punk", "Variété française",
//! "Hip-Hop/Rap"), so songs are bucketed into a closed [`GenreCategory`]
//! taxonomy by keyword matching.
//!
//! # Rule order
//!
//! [`RULES`] is evaluated top to bottom and the first rule with any matching
//! keyword wins. Keyword sets overlap ("britpop" matches both `brit` and
//! `pop`, "christmas" matches both `christmas` and `christ`), so the table
//! order decides the outcome and must not be re-sorted.

use std::fmt;

use crate::text::fold;

/// Broad music genre bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenreCategory {
    Country,
    Disco,
    NewAge,
    Alternative,
    Rap,
    Classical,
    Dance,
    Electronic,
    House,
    Reggae,
    Rock,
    Pop,
    Jazz,
    Latin,
    Metal,
    Singer,
    Soundtrack,
    Game,
    Gospel,
    World,
    Instrumental,
    Meditative,
    Experimental,
    JPop,
    Book,
    Fantasy,
    Kids,
    Teens,
    Sports,
    Surf,
    Tv,
    BritPop,
    Variete,
    German,
    Unknown,
}

impl GenreCategory {
    /// Short pictogram shown next to song titles.
    pub fn symbol(self) -> &'static str {
        match self {
            GenreCategory::Country => "🤠",
            GenreCategory::Disco => "🕺",
            GenreCategory::NewAge => "📻",
            GenreCategory::Alternative => "🔌",
            GenreCategory::Rap => "🎙",
            GenreCategory::Classical => "🎻",
            GenreCategory::Dance => "💃",
            GenreCategory::Electronic => "🎛",
            GenreCategory::House => "🏠",
            GenreCategory::Reggae => "🇯🇲",
            GenreCategory::Rock => "🎸",
            GenreCategory::Pop => "🎤",
            GenreCategory::Jazz => "🎷",
            GenreCategory::Latin => "🇪🇸",
            GenreCategory::Metal => "🤘",
            GenreCategory::Singer => "👨‍🎤",
            GenreCategory::Soundtrack => "🎥",
            GenreCategory::Game => "🎮",
            GenreCategory::Gospel => "⛪️",
            GenreCategory::World => "🌍",
            GenreCategory::Instrumental => "🎹",
            GenreCategory::Meditative => "💤",
            GenreCategory::Experimental => "⚗️",
            GenreCategory::JPop => "🇯🇵",
            GenreCategory::Book => "📓",
            GenreCategory::Fantasy => "👽",
            GenreCategory::Kids => "👶",
            GenreCategory::Teens => "⭐️",
            GenreCategory::Sports => "⚽️",
            GenreCategory::Surf => "🏄",
            GenreCategory::Tv => "📺",
            GenreCategory::BritPop => "🇬🇧",
            GenreCategory::Variete => "🇫🇷",
            GenreCategory::German => "🇩🇪",
            GenreCategory::Unknown => "❓",
        }
    }
}

impl fmt::Display for GenreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GenreCategory::Country => "Country",
            GenreCategory::Disco => "Disco & Funk",
            GenreCategory::NewAge => "New Age & Oldies",
            GenreCategory::Alternative => "Alternative",
            GenreCategory::Rap => "Rap & Soul",
            GenreCategory::Classical => "Classical",
            GenreCategory::Dance => "Dance",
            GenreCategory::Electronic => "Electronic",
            GenreCategory::House => "House & Lounge",
            GenreCategory::Reggae => "Reggae",
            GenreCategory::Rock => "Rock",
            GenreCategory::Pop => "Pop",
            GenreCategory::Jazz => "Jazz",
            GenreCategory::Latin => "Latin",
            GenreCategory::Metal => "Metal & Punk",
            GenreCategory::Singer => "Singer-Songwriter",
            GenreCategory::Soundtrack => "Soundtrack",
            GenreCategory::Game => "Game",
            GenreCategory::Gospel => "Gospel",
            GenreCategory::World => "World",
            GenreCategory::Instrumental => "Instrumental",
            GenreCategory::Meditative => "Meditative",
            GenreCategory::Experimental => "Experimental",
            GenreCategory::JPop => "J-Pop",
            GenreCategory::Book => "Audiobook",
            GenreCategory::Fantasy => "Fantasy & Sci-Fi",
            GenreCategory::Kids => "Kids & Holiday",
            GenreCategory::Teens => "Teens",
            GenreCategory::Sports => "Sports",
            GenreCategory::Surf => "Surf",
            GenreCategory::Tv => "TV",
            GenreCategory::BritPop => "Britpop",
            GenreCategory::Variete => "Variété",
            GenreCategory::German => "German",
            GenreCategory::Unknown => "Unknown",
        };
        write!(f, "{}", text)
    }
}

/// Ordered keyword rules. Keywords are matched as substrings of the folded
/// (lowercase, accent-free) genre text.
pub const RULES: &[(GenreCategory, &[&str])] = &[
    (GenreCategory::Country, &["country"]),
    (GenreCategory::Variete, &["variete", "franc", "french"]),
    (GenreCategory::BritPop, &["brit"]),
    (GenreCategory::German, &["german"]),
    (GenreCategory::Disco, &["disco", "funk", "wave"]),
    (GenreCategory::NewAge, &["age", "old", "swing"]),
    (
        GenreCategory::Rap,
        &["rap", "hip-hop", "hiphop", "hip hop", "soul", "r&b", "rnb", "r'n'b"],
    ),
    (GenreCategory::Alternative, &["alternati", "indie", "trip"]),
    (GenreCategory::Classical, &["classi", "symphoni", "sonat", "chamb"]),
    (GenreCategory::Dance, &["dance", "danse"]),
    (
        GenreCategory::Electronic,
        &["lectroni", "dubstep", "tech", "trance", "fusion", "acid", "club"],
    ),
    (GenreCategory::House, &["house", "lounge"]),
    (GenreCategory::Reggae, &["reggae", "dub", "root", "ska"]),
    (GenreCategory::Jazz, &["jazz"]),
    (
        GenreCategory::Latin,
        &["latin", "tango", "samba", "spain", "spanish", "espagn"],
    ),
    (GenreCategory::Metal, &["metal", "punk", "hard", "bass", "jungle"]),
    (
        GenreCategory::Singer,
        &[
            "singer", "chant", "vocal", "auteur", "writer", "voix", "voice", "spoken", "parle",
            "podcast",
        ],
    ),
    (GenreCategory::Soundtrack, &["soundtrack", "movie", "film", "video"]),
    (
        GenreCategory::Kids,
        &[
            "kid",
            "child",
            "enfan",
            "family",
            "famille",
            "christmas",
            "holiday",
            "vacance",
        ],
    ),
    (
        GenreCategory::Gospel,
        &["gospel", "christ", "chreti", "religi", "spirit"],
    ),
    (GenreCategory::World, &["world", "monde", "folk", "europ"]),
    (
        GenreCategory::Instrumental,
        &["instrument", "acousti", "ambient", "ambian"],
    ),
    (GenreCategory::Meditative, &["meditat", "down"]),
    (GenreCategory::JPop, &["jpop", "j-pop", "j pop", "anime"]),
    (GenreCategory::Book, &["book"]),
    (GenreCategory::Fantasy, &["fantas", "scifi", "sci-fi", "sci fi"]),
    (GenreCategory::Surf, &["surf"]),
    (GenreCategory::Sports, &["sport"]),
    (GenreCategory::Tv, &["tv", "television"]),
    (GenreCategory::Pop, &["pop"]),
    (
        GenreCategory::Rock,
        &["rock", "grunge", "drum", "blues", "guitar"],
    ),
    (GenreCategory::Experimental, &["experiment", "industrial"]),
    (GenreCategory::Game, &["game", "jeu"]),
    (GenreCategory::Teens, &["teen", "ado"]),
    (GenreCategory::Unknown, &["unknown", "other", "easy"]),
];

/// Find the first rule matching `input`, if any.
///
/// Returns `None` when no keyword matches at all, which callers fold into
/// [`GenreCategory::Unknown`].
pub fn match_rule(input: &str) -> Option<GenreCategory> {
    let normalized = fold(input);
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| normalized.contains(k)))
        .map(|(category, _)| *category)
}

/// Classify a raw genre tag. Missing tags and unrecognized text are both
/// [`GenreCategory::Unknown`].
pub fn classify(raw: Option<&str>) -> GenreCategory {
    raw.and_then(match_rule).unwrap_or(GenreCategory::Unknown)
}

/// A song's genre: the bucket plus the tag text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub category: GenreCategory,
    pub raw: Option<String>,
}

impl Genre {
    /// Build from an optional raw tag, classifying it.
    pub fn from_raw(raw: Option<String>) -> Self {
        Self {
            category: classify(raw.as_deref()),
            raw,
        }
    }
}
