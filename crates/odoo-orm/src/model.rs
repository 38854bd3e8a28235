use crate::{ModelBuilder, Record};

/// A typed view over [`Record`]s of one declared model.
pub trait Model: Sized {
    /// Local name the model is registered under. Must match the name given
    /// to [`ModelBuilder::new`] in [`Model::schema`].
    const NAME: &'static str;

    /// The model's declaration.
    fn schema() -> ModelBuilder;

    /// Wraps a record read through this model's manager.
    fn load(record: Record) -> Self;

    fn record(&self) -> &Record;

    fn id(&self) -> i64 {
        self.record().id()
    }
}
