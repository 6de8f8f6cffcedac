// Wire date format. No timezone suffix; calendar days are UTC.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Pagination defaults
pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

// Availability defaults
pub const DEFAULT_ROOMS: i32 = 1;
pub const MAX_ROOMS: i32 = 50;

// Party size limits, shared by search and booking
pub const MAX_ADULTS: i32 = 50;
pub const MAX_CHILDREN: i32 = 50;

// Reservation codes: {PROPERTY_CODE}-{UNIT_TYPE_CODE}-{4 alphanumeric}
pub const RESERVATION_CODE_SUFFIX_LEN: usize = 4;
pub const RESERVATION_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const RESERVATION_CODE_MAX_ATTEMPTS: u32 = 3;
pub const RESERVATION_CODE_PATTERN: &str = r"^[A-Z0-9_]+-[A-Z0-9_]+-[A-Z0-9]{4}$";

// Money
pub const MONEY_DECIMAL_PLACES: u32 = 2;

// Guest input limits
pub const MAX_NAME_LENGTH: u64 = 100;
pub const MAX_PHONE_LENGTH: u64 = 32;

// Success messages
pub const SUCCESS_RESERVATION_CREATED: &str = "Reservation confirmed";
pub const SUCCESS_RESERVATION_CANCELLED: &str = "Reservation cancelled";
