//! Static vocabularies and scoring constants.
//!
//! The weights and caps below were tuned by hand against real installs.
//! They are kept as-is for parity; nothing else depends on their exact values.

/// Score for a location keyword found in the id or label.
pub const WEIGHT_LOCATION: u32 = 3;

/// Score for a device keyword whose target domain equals the record's domain.
pub const WEIGHT_DEVICE_DOMAIN: u32 = 2;

/// Score for a device keyword found in the label.
pub const WEIGHT_DEVICE_NAME: u32 = 1;

/// Score for a prompt word found in the id or label.
pub const WEIGHT_WORD_OVERLAP: u32 = 1;

/// Candidates scoring below this are dropped.
pub const DETECT_MIN_SCORE: u32 = 2;

/// Maximum candidates returned by prompt detection.
pub const DETECT_MAX_CANDIDATES: usize = 8;

/// Prompt words must be longer than this to count for overlap.
pub const WORD_OVERLAP_MIN_LEN: usize = 2;

/// Maximum autocomplete suggestions.
pub const AUTOCOMPLETE_MAX_SUGGESTIONS: usize = 15;

/// Idle time before autocomplete recomputes (milliseconds).
pub const AUTOCOMPLETE_DEBOUNCE_MS: u64 = 150;

/// Cap on records sent with a chat-mode generation request.
pub const CHAT_MAX_ENTITIES: usize = 100;

// ─── Prompt detection ────────────────────────────────────────────

/// Rooms and places recognised by prompt detection.
pub static DETECT_LOCATIONS: &[&str] = &[
    "kitchen",
    "bedroom",
    "living room",
    "bathroom",
    "garage",
    "office",
    "dining room",
    "hallway",
    "basement",
    "attic",
    "gym",
    "porch",
    "deck",
    "patio",
    "upstairs",
    "downstairs",
];

/// Device-type keyword and the domains it directly implies.
///
/// An empty domain list means the keyword only scores via the label.
#[derive(Debug, PartialEq, Eq)]
pub struct DeviceKeyword {
    pub keyword: &'static str,
    pub domains: &'static [&'static str],
}

pub static DETECT_DEVICES: &[DeviceKeyword] = &[
    DeviceKeyword { keyword: "light", domains: &["light"] },
    DeviceKeyword { keyword: "lights", domains: &["light"] },
    DeviceKeyword { keyword: "lamp", domains: &[] },
    DeviceKeyword { keyword: "switch", domains: &["switch"] },
    DeviceKeyword { keyword: "outlet", domains: &[] },
    DeviceKeyword { keyword: "fan", domains: &["fan"] },
    DeviceKeyword { keyword: "thermostat", domains: &[] },
    DeviceKeyword { keyword: "lock", domains: &[] },
    DeviceKeyword { keyword: "door", domains: &[] },
    DeviceKeyword { keyword: "window", domains: &[] },
    DeviceKeyword { keyword: "sensor", domains: &["sensor", "binary_sensor"] },
    DeviceKeyword { keyword: "camera", domains: &[] },
    DeviceKeyword { keyword: "speaker", domains: &[] },
    DeviceKeyword { keyword: "tv", domains: &[] },
    DeviceKeyword { keyword: "television", domains: &[] },
    DeviceKeyword { keyword: "dimmer", domains: &[] },
];

// ─── Chat mode ───────────────────────────────────────────────────

/// Keyword to plausible domains. Order is significant: the union of
/// matched domains keeps first-seen order.
pub static CHAT_KEYWORD_DOMAINS: &[(&str, &[&str])] = &[
    // devices
    ("light", &["light", "switch"]),
    ("lights", &["light", "switch"]),
    ("lamp", &["light", "switch"]),
    ("bulb", &["light"]),
    ("switch", &["switch", "light"]),
    ("door", &["binary_sensor", "cover", "lock"]),
    ("garage", &["cover", "binary_sensor"]),
    ("window", &["binary_sensor", "cover"]),
    ("lock", &["lock"]),
    ("motion", &["binary_sensor"]),
    ("presence", &["binary_sensor", "device_tracker", "person"]),
    ("temperature", &["sensor", "climate"]),
    ("humidity", &["sensor"]),
    ("thermostat", &["climate"]),
    ("fan", &["fan", "switch"]),
    ("tv", &["media_player", "switch"]),
    ("television", &["media_player", "switch"]),
    ("music", &["media_player"]),
    ("speaker", &["media_player"]),
    ("camera", &["camera"]),
    ("vacuum", &["vacuum"]),
    ("alarm", &["alarm_control_panel"]),
    ("sensor", &["sensor", "binary_sensor"]),
    // states and conditions
    ("open", &["binary_sensor", "cover"]),
    ("closed", &["binary_sensor", "cover"]),
    ("on", &["light", "switch", "binary_sensor"]),
    ("off", &["light", "switch", "binary_sensor"]),
    ("home", &["person", "device_tracker", "zone"]),
    ("away", &["person", "device_tracker", "zone"]),
    ("detected", &["binary_sensor"]),
    // actions
    ("notify", &["notify"]),
    ("alert", &["notify"]),
    ("message", &["notify"]),
    ("announce", &["notify", "media_player"]),
    ("turn", &["light", "switch", "fan"]),
    ("dim", &["light"]),
    ("brighten", &["light"]),
    ("play", &["media_player"]),
    ("pause", &["media_player"]),
    ("stop", &["media_player"]),
    // time
    ("sunrise", &["sun"]),
    ("sunset", &["sun"]),
    ("sun", &["sun"]),
];

/// Domains used when no chat keyword matches.
pub static CHAT_DEFAULT_DOMAINS: &[&str] = &[
    "light",
    "switch",
    "binary_sensor",
    "sensor",
    "person",
    "device_tracker",
];

/// Rooms and places recognised in chat mode.
pub static CHAT_LOCATIONS: &[&str] = &[
    "kitchen",
    "living room",
    "bedroom",
    "bathroom",
    "garage",
    "basement",
    "office",
    "dining room",
    "family room",
    "guest room",
    "master bedroom",
    "kids room",
    "laundry room",
    "pantry",
    "closet",
    "hallway",
    "stairs",
    "entryway",
    "foyer",
    "porch",
    "deck",
    "patio",
    "yard",
    "garden",
    "driveway",
    "outdoors",
    "outside",
    "upstairs",
    "downstairs",
    "main floor",
    "teen center",
    "playroom",
    "gym",
    "apartment",
    "studio",
    "loft",
    "attic",
];

// ─── Intent ──────────────────────────────────────────────────────

/// Words that mark a chat message as a tweak of the previous config.
pub static REFINEMENT_KEYWORDS: &[&str] = &[
    "also",
    "add",
    "change",
    "modify",
    "update",
    "remove",
    "but",
    "except",
    "only",
    "instead",
    "different",
];
