pub mod app;
pub mod error;
pub mod settings;
pub mod models {
    pub mod schemas;
    pub mod validation;
}
pub mod db {
    pub mod collection;
    #[cfg(test)]
    pub mod memory;
    pub mod store;
}
pub mod api {
    pub mod contact;
    pub mod episodes;
    pub mod errors;
    pub mod health;
}
