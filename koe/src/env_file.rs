//! `.env` loading

/// Treat a missing `.env` file as nothing to load
pub fn load<T>(result: dotenvy::Result<T>) -> Result<Option<T>, dotenvy::Error> {
    match result {
        Ok(loaded) => Ok(Some(loaded)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
