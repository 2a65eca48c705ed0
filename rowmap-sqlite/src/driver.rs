use rowmap_core::Driver;

#[derive(Default, Clone, Copy, Debug)]
pub struct SqliteDriver {}

impl SqliteDriver {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Driver for SqliteDriver {
    const NAME: &'static str = "sqlite";
}
