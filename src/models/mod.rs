pub mod hotel;
pub mod page;
pub mod payment;
pub mod reservation;
pub mod user;

pub use hotel::{Hotel, HotelFilter, HotelInput, HotelStatus};
pub use page::{Page, PageParams};
pub use payment::{Payment, PaymentFilter, PaymentMethod, PaymentStatus};
pub use reservation::{PaymentState, Reservation, ReservationFilter, ReservationStatus};
pub use user::{Role, User, UserFilter, UserView};
