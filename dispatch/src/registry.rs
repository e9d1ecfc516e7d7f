//! Concurrency-safe command registry.
//!
//! Commands register once during process initialization and are read for
//! the remainder of the process lifetime; there is no deregistration. A
//! reader/writer lock guards the collection: registration takes the
//! exclusive lock, lookups the shared lock.

use std::sync::{Arc, RwLock};

use crate::command::Command;
use crate::error::CommandError;

use command_gate_core::Value;

use crate::command::Client;

/// Append-only catalogue of commands, keyed by (namespace, resource,
/// verb).
///
/// # Examples
///
/// ```
/// use command_gate_dispatch::{Command, Registry};
///
/// let registry = Registry::new();
/// registry.register(
///     Command::new("instance", "list").with_exec(|_, _, params| Ok(params)),
/// )?;
///
/// assert!(registry.get("instance", None, "list").is_some());
/// assert!(registry.get("instance", None, "delete").is_none());
/// # Ok::<(), command_gate_dispatch::CommandError>(())
/// ```
#[derive(Default)]
pub struct Registry {
    commands: RwLock<Vec<Arc<Command>>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Registers a command, rejecting a duplicate (namespace, resource,
    /// verb) key.
    ///
    /// Two commands with an identical key would silently shadow one
    /// another at lookup time; under the append-then-read lifecycle that
    /// is always a startup misconfiguration, so it fails here instead.
    pub fn register(&self, command: Command) -> Result<Arc<Command>, CommandError> {
        let key = command.key();
        let mut commands = self.commands.write().expect("registry lock poisoned");
        if commands.iter().any(|existing| existing.key() == key) {
            return Err(CommandError::Duplicate(key.to_string()));
        }
        let command = Arc::new(command);
        commands.push(Arc::clone(&command));
        Ok(command)
    }

    /// Returns the first command matching the exact key.
    pub fn get(&self, namespace: &str, resource: Option<&str>, verb: &str) -> Option<Arc<Command>> {
        let commands = self.commands.read().expect("registry lock poisoned");
        commands
            .iter()
            .find(|c| {
                c.namespace == namespace && c.resource.as_deref() == resource && c.verb == verb
            })
            .map(Arc::clone)
    }

    /// Returns every command matching the predicate, as an independent
    /// collection.
    pub fn get_by_filter(&self, predicate: impl Fn(&Command) -> bool) -> Vec<Arc<Command>> {
        let commands = self.commands.read().expect("registry lock poisoned");
        commands
            .iter()
            .filter(|c| predicate(c))
            .map(Arc::clone)
            .collect()
    }

    /// Looks up a command by key and runs its dispatch pipeline.
    pub fn dispatch(
        &self,
        namespace: &str,
        resource: Option<&str>,
        verb: &str,
        client: &dyn Client,
        params: Value,
    ) -> Result<Value, CommandError> {
        let Some(command) = self.get(namespace, resource, verb) else {
            let shown = match resource {
                Some(resource) => format!("{namespace} {resource} {verb}"),
                None => format!("{namespace} {verb}"),
            };
            return Err(CommandError::NotFound(shown));
        };
        command.run(client, params)
    }

    pub fn len(&self) -> usize {
        self.commands.read().expect("registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(namespace: &str, resource: Option<&str>, verb: &str) -> Command {
        let mut cmd = Command::new(namespace, verb).with_exec(|_, _, params| Ok(params));
        if let Some(resource) = resource {
            cmd = cmd.with_resource(resource);
        }
        cmd
    }

    #[test]
    fn test_register_and_get_by_exact_key() {
        let registry = Registry::new();
        registry
            .register(command("instance", Some("server"), "create"))
            .unwrap();
        registry
            .register(command("instance", Some("server"), "delete"))
            .unwrap();

        assert!(registry.get("instance", Some("server"), "create").is_some());
        assert!(registry.get("instance", None, "create").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let registry = Registry::new();
        registry.register(command("vpc", None, "list")).unwrap();

        let err = registry.register(command("vpc", None, "list")).unwrap_err();
        assert!(matches!(err, CommandError::Duplicate(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_filter_returns_independent_collection() {
        let registry = Registry::new();
        registry.register(command("vpc", None, "list")).unwrap();
        registry.register(command("vpc", None, "create")).unwrap();
        registry.register(command("dns", None, "list")).unwrap();

        let vpc = registry.get_by_filter(|c| c.namespace == "vpc");
        assert_eq!(vpc.len(), 2);

        registry.register(command("vpc", None, "delete")).unwrap();
        assert_eq!(vpc.len(), 2);
    }

    #[test]
    fn test_concurrent_registration_is_safe() {
        let registry = Arc::new(Registry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let verb = format!("verb-{i}");
                    registry.register(command("load", None, &verb)).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 8);
    }
}
