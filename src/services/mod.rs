pub mod alert_service;
pub mod portfolio;
pub mod provider;
pub mod screener;
pub mod technicals;
