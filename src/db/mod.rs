pub mod dashboarddb;
pub mod db;
pub mod purchasedb;
pub mod referraldb;
pub mod userdb;
