pub mod dashboardmodel;
pub mod purchasemodel;
pub mod referralmodel;
pub mod usermodel;
