//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod cart_repo;
pub mod dashboard_repo;
pub mod order_repo;
pub mod product_repo;
pub mod product_size_repo;
pub mod profile_repo;
pub mod user_repo;
pub mod wishlist_repo;

pub use cart_repo::CartRepo;
pub use dashboard_repo::DashboardRepo;
pub use order_repo::OrderRepo;
pub use product_repo::ProductRepo;
pub use product_size_repo::ProductSizeRepo;
pub use profile_repo::ProfileRepo;
pub use user_repo::UserRepo;
pub use wishlist_repo::WishlistRepo;
