pub mod moex;

pub use moex::MoexClient;
