//! Test fixture setup and teardown.
//!
//! Fixtures manage per-suite resources (driver, config, session cache)
//! with ordered setup and reverse-ordered teardown. Each test case still
//! starts from fresh page state; fixtures only manage process-level
//! resources.

use crate::result::{ComprarError, ComprarResult};

/// A resource with managed setup and teardown.
pub trait Fixture: Send + Sync {
    /// Set up the fixture before the suite runs.
    ///
    /// # Errors
    ///
    /// Returns an error if setup fails.
    fn setup(&mut self) -> ComprarResult<()>;

    /// Tear down the fixture after the suite.
    ///
    /// # Errors
    ///
    /// Returns an error if teardown fails.
    fn teardown(&mut self) -> ComprarResult<()>;

    /// Fixture name for logging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Priority: higher is set up first and torn down last
    fn priority(&self) -> i32 {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FixtureState {
    Registered,
    SetUp,
    TornDown,
    Failed,
}

struct FixtureEntry {
    fixture: Box<dyn Fixture>,
    state: FixtureState,
}

/// Priority-ordered fixture manager.
///
/// Setup runs highest-priority first; teardown runs in reverse setup
/// order. A failed setup tears down everything already set up before
/// reporting the error.
#[derive(Default)]
pub struct FixtureManager {
    entries: Vec<FixtureEntry>,
}

impl std::fmt::Debug for FixtureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureManager")
            .field("fixture_count", &self.entries.len())
            .finish()
    }
}

impl FixtureManager {
    /// Create an empty manager
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixture
    pub fn register<F: Fixture + 'static>(&mut self, fixture: F) {
        self.entries.push(FixtureEntry {
            fixture: Box::new(fixture),
            state: FixtureState::Registered,
        });
        self.entries
            .sort_by_key(|entry| std::cmp::Reverse(entry.fixture.priority()));
    }

    /// Number of registered fixtures
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Set up all fixtures in priority order.
    ///
    /// # Errors
    ///
    /// Returns the first setup failure, after tearing down fixtures that
    /// were already set up.
    pub fn setup_all(&mut self) -> ComprarResult<()> {
        let mut failed: Option<String> = None;
        for entry in &mut self.entries {
            if entry.state != FixtureState::Registered && entry.state != FixtureState::TornDown {
                continue;
            }
            match entry.fixture.setup() {
                Ok(()) => entry.state = FixtureState::SetUp,
                Err(e) => {
                    failed = Some(format!("fixture '{}' setup failed: {e}", entry.fixture.name()));
                    entry.state = FixtureState::Failed;
                    break;
                }
            }
        }

        if let Some(message) = failed {
            let _ = self.teardown_all();
            return Err(ComprarError::FixtureError { message });
        }
        Ok(())
    }

    /// Tear down all set-up fixtures in reverse order.
    ///
    /// # Errors
    ///
    /// Returns the first teardown failure; remaining fixtures are still
    /// torn down.
    pub fn teardown_all(&mut self) -> ComprarResult<()> {
        let mut first_error: Option<ComprarError> = None;
        for entry in self.entries.iter_mut().rev() {
            if entry.state != FixtureState::SetUp {
                continue;
            }
            match entry.fixture.teardown() {
                Ok(()) => entry.state = FixtureState::TornDown,
                Err(e) => {
                    entry.state = FixtureState::Failed;
                    if first_error.is_none() {
                        first_error = Some(ComprarError::FixtureError {
                            message: format!(
                                "fixture '{}' teardown failed: {e}",
                                entry.fixture.name()
                            ),
                        });
                    }
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Recording {
        name: &'static str,
        priority: i32,
        log: Arc<std::sync::Mutex<Vec<String>>>,
        fail_setup: bool,
    }

    impl Fixture for Recording {
        fn setup(&mut self) -> ComprarResult<()> {
            if self.fail_setup {
                return Err(ComprarError::FixtureError {
                    message: "boom".to_string(),
                });
            }
            self.log.lock().unwrap().push(format!("setup {}", self.name));
            Ok(())
        }

        fn teardown(&mut self) -> ComprarResult<()> {
            self.log
                .lock()
                .unwrap()
                .push(format!("teardown {}", self.name));
            Ok(())
        }

        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }
    }

    #[test]
    fn test_priority_order_and_reverse_teardown() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut manager = FixtureManager::new();
        manager.register(Recording {
            name: "driver",
            priority: 0,
            log: Arc::clone(&log),
            fail_setup: false,
        });
        manager.register(Recording {
            name: "config",
            priority: 10,
            log: Arc::clone(&log),
            fail_setup: false,
        });

        manager.setup_all().unwrap();
        manager.teardown_all().unwrap();

        let entries = log.lock().unwrap().clone();
        assert_eq!(
            entries,
            vec![
                "setup config",
                "setup driver",
                "teardown driver",
                "teardown config"
            ]
        );
    }

    #[test]
    fn test_failed_setup_tears_down_earlier_fixtures() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut manager = FixtureManager::new();
        manager.register(Recording {
            name: "ok",
            priority: 1,
            log: Arc::clone(&log),
            fail_setup: false,
        });
        manager.register(Recording {
            name: "bad",
            priority: 0,
            log: Arc::clone(&log),
            fail_setup: true,
        });

        let result = manager.setup_all();
        assert!(matches!(result, Err(ComprarError::FixtureError { .. })));

        let entries = log.lock().unwrap().clone();
        assert_eq!(entries, vec!["setup ok", "teardown ok"]);
    }

    #[test]
    fn test_counter_fixture() {
        struct Counter(Arc<AtomicUsize>);
        impl Fixture for Counter {
            fn setup(&mut self) -> ComprarResult<()> {
                let _ = self.0.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            fn teardown(&mut self) -> ComprarResult<()> {
                let _ = self.0.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let live = Arc::new(AtomicUsize::new(0));
        let mut manager = FixtureManager::new();
        manager.register(Counter(Arc::clone(&live)));
        assert_eq!(manager.count(), 1);

        manager.setup_all().unwrap();
        assert_eq!(live.load(Ordering::SeqCst), 1);
        manager.teardown_all().unwrap();
        assert_eq!(live.load(Ordering::SeqCst), 0);
    }
}
