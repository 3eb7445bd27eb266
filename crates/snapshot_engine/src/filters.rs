use std::collections::BTreeMap;
use std::fmt;

use engine_logging::{engine_debug, engine_warn};

use crate::document::Document;
use crate::error::FilterError;

/// A source-specific fix-up applied to the parsed page before any rule runs.
pub trait ServiceFilter: Send + Sync {
    fn mutate(&self, document: &mut Document);
}

impl<F> ServiceFilter for F
where
    F: Fn(&mut Document) + Send + Sync,
{
    fn mutate(&self, document: &mut Document) {
        self(document)
    }
}

/// Named service filters supplied by the caller.
#[derive(Default)]
pub struct FilterRegistry {
    filters: BTreeMap<String, Box<dyn ServiceFilter>>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `filter` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, filter: impl ServiceFilter + 'static) {
        self.filters.insert(name.into(), Box::new(filter));
    }

    pub fn with(mut self, name: impl Into<String>, filter: impl ServiceFilter + 'static) -> Self {
        self.register(name, filter);
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn ServiceFilter> {
        self.filters.get(name).map(|filter| filter.as_ref())
    }

    /// Runs the named filters in order. Stops at the first unknown name;
    /// filters that already ran keep their changes.
    pub fn apply<S: AsRef<str>>(
        &self,
        names: &[S],
        document: &mut Document,
    ) -> Result<(), FilterError> {
        for name in names {
            let name = name.as_ref();
            let Some(filter) = self.get(name) else {
                engine_warn!("service filter {name:?} is not registered");
                return Err(FilterError::UnknownFilter {
                    name: name.to_string(),
                });
            };
            filter.mutate(document);
            engine_debug!("applied service filter {name:?}");
        }
        Ok(())
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}
