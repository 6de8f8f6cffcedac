pub mod jwt;
pub mod reservation_code;
pub mod validation;

pub use jwt::{Claims, JwtService};
pub use reservation_code::{generate_reservation_code, is_valid_reservation_code};
pub use validation::*;
