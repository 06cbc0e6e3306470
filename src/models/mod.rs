pub mod chatmodels;
pub mod jobmodel;
pub mod notificationmodel;
pub mod walletmodels;
