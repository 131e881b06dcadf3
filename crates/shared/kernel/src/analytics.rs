use parking_lot::Mutex;
use std::borrow::Cow;
use std::fmt::{self, Debug};
use tracing::info;
use wf_domain::constants::ANALYTICS_TARGET;

/// A single analytics event: a name plus flat key/value properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsEvent {
    pub name: Cow<'static, str>,
    pub properties: Vec<(Cow<'static, str>, String)>,
}

impl AnalyticsEvent {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into(), properties: Vec::new() }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<Cow<'static, str>>, value: impl ToString) -> Self {
        self.properties.push((key.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for AnalyticsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (key, value) in &self.properties {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

/// Process-wide analytics sink. Registered once at startup.
pub trait AnalyticsDispatcher: Debug + Send + Sync {
    fn track(&self, event: AnalyticsEvent);
}

/// Emits analytics events as `tracing` events on the `analytics` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnalytics;

impl AnalyticsDispatcher for TracingAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        info!(target: ANALYTICS_TARGET, event = %event.name, properties = %event, "Analytics event");
    }
}

/// Keeps events in memory; handy for asserting on what a flow reported.
#[derive(Debug, Default)]
pub struct MemoryAnalytics {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl MemoryAnalytics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().clone()
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.name.to_string()).collect()
    }
}

impl AnalyticsDispatcher for MemoryAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        self.events.lock().push(event);
    }
}
