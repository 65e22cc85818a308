pub mod account;
pub mod auth;
pub mod fd;
pub mod product;
pub mod profile;
pub mod session;

pub use account::{AccountStatus, FdAccount, OpenAccountRequest};
pub use auth::{AuthPayload, LoginRequest, RegisterRequest};
pub use fd::{CalculationRequest, CalculationResult};
pub use product::{CreateProductRequest, FdProduct, ProductStatus, UpdateProductRequest};
pub use profile::{CustomerProfile, UpdateProfileRequest};
pub use session::{Session, SessionState, UserInfo, UserType};
