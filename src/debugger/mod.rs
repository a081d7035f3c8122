use serde_json::Value;

/// A trait for components whose state can be inspected by diagnostics.
pub trait Debuggable {
    /// Reads the component's state and returns it as a JSON value.
    fn read_state(&self) -> Value;
}
