pub mod app_config;
pub mod product_repo;
pub mod order_repo;
pub mod seed;

pub use product_repo::InMemoryProductRepository;
pub use order_repo::InMemoryOrderRepository;
