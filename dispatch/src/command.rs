//! Commands and the dispatch pipeline.
//!
//! A [`Command`] is a named, validated, executable operation keyed by its
//! (namespace, resource, verb) triple. [`Command::run`] drives the fixed
//! pipeline: pre-params hook → structural validation → pre-rules hook →
//! business rules → execution function. Stages run strictly in order and
//! the first error is returned to the caller unchanged.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use command_gate_core::Value;

use crate::carrier::Carrier;
use crate::error::CommandError;
use crate::rules::{ConditionalRule, Scope, evaluate_rules};
use crate::spec::ParamSpec;
use crate::tags::{StandardTagValidator, TagValidator};

/// The caller-supplied collaborator handed through to hooks and the
/// execution function.
///
/// The engine never inspects the client beyond the scope accessor, which
/// rule evaluation needs when scoped rules are declared. The default
/// implementation exposes no scope.
pub trait Client: Send + Sync {
    /// The caller's active deployment scope, if any.
    fn current_scope(&self) -> Option<Scope> {
        None
    }
}

/// Hook invoked before validation stages; may rewrite the parameter value.
pub type HookFn =
    Arc<dyn Fn(&Command, &dyn Client, Value) -> Result<Value, CommandError> + Send + Sync>;

/// The business operation invoked after all validation passes.
pub type ExecFn =
    Arc<dyn Fn(&Command, &dyn Client, Value) -> Result<Value, CommandError> + Send + Sync>;

/// Identity key of a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CommandKey {
    pub namespace: String,
    pub resource: Option<String>,
    pub verb: String,
}

impl fmt::Display for CommandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource {
            Some(resource) => write!(f, "{} {} {}", self.namespace, resource, self.verb),
            None => write!(f, "{} {}", self.namespace, self.verb),
        }
    }
}

/// A named, validated, executable operation.
///
/// Built with chained setters:
///
/// ```
/// use command_gate_core::Value;
/// use command_gate_dispatch::{Command, Ipv4, ParamSpec};
///
/// let cmd = Command::new("instance", "create")
///     .with_resource("server")
///     .with_short_doc("Create a server")
///     .with_param(ParamSpec::required("ip").with_validator(Ipv4))
///     .with_exec(|_cmd, _client, params| Ok(params));
///
/// assert_eq!(cmd.key().to_string(), "instance server create");
/// ```
pub struct Command {
    pub namespace: String,
    pub resource: Option<String>,
    pub verb: String,
    /// One-line documentation.
    pub short_doc: String,
    /// Long-form documentation.
    pub long_doc: String,
    pub params: Vec<ParamSpec>,
    pub rules: Vec<ConditionalRule>,
    pre_params_hook: Option<HookFn>,
    pre_rules_hook: Option<HookFn>,
    exec: Option<ExecFn>,
    tag_validator: Arc<dyn TagValidator>,
    /// Excluded from generated listings.
    pub hidden: bool,
    pub deprecated: bool,
}

impl Command {
    /// Creates a command with the given namespace and verb.
    pub fn new(namespace: &str, verb: &str) -> Self {
        Command {
            namespace: namespace.to_string(),
            resource: None,
            verb: verb.to_string(),
            short_doc: String::new(),
            long_doc: String::new(),
            params: Vec::new(),
            rules: Vec::new(),
            pre_params_hook: None,
            pre_rules_hook: None,
            exec: None,
            tag_validator: Arc::new(StandardTagValidator),
            hidden: false,
            deprecated: false,
        }
    }

    pub fn with_resource(mut self, resource: &str) -> Self {
        self.resource = Some(resource.to_string());
        self
    }

    pub fn with_short_doc(mut self, doc: &str) -> Self {
        self.short_doc = doc.to_string();
        self
    }

    pub fn with_long_doc(mut self, doc: &str) -> Self {
        self.long_doc = doc.to_string();
        self
    }

    pub fn with_param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    pub fn with_rule(mut self, rule: ConditionalRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Installs the hook run before structural validation.
    pub fn with_pre_params_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Command, &dyn Client, Value) -> Result<Value, CommandError> + Send + Sync + 'static,
    {
        self.pre_params_hook = Some(Arc::new(hook));
        self
    }

    /// Installs the hook run after structural validation, before rules.
    pub fn with_pre_rules_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Command, &dyn Client, Value) -> Result<Value, CommandError> + Send + Sync + 'static,
    {
        self.pre_rules_hook = Some(Arc::new(hook));
        self
    }

    /// Installs the execution function.
    pub fn with_exec<F>(mut self, exec: F) -> Self
    where
        F: Fn(&Command, &dyn Client, Value) -> Result<Value, CommandError> + Send + Sync + 'static,
    {
        self.exec = Some(Arc::new(exec));
        self
    }

    /// Replaces the tag interpreter used for structural validation.
    pub fn with_tag_validator(mut self, validator: Arc<dyn TagValidator>) -> Self {
        self.tag_validator = validator;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// The identity key triple.
    pub fn key(&self) -> CommandKey {
        CommandKey {
            namespace: self.namespace.clone(),
            resource: self.resource.clone(),
            verb: self.verb.clone(),
        }
    }

    /// Runs the dispatch pipeline.
    ///
    /// Stages execute strictly in order; any error short-circuits the
    /// remaining stages and is returned unchanged:
    ///
    /// 1. The pre-params hook may rewrite `params` (e.g. defaulting).
    /// 2. Declared [`ParamSpec`]s are synthesized into a carrier and
    ///    validated through the tag interpreter.
    /// 3. The pre-rules hook may rewrite `params` again.
    /// 4. Declared [`ConditionalRule`]s are evaluated. Scoped rules need
    ///    the client's scope accessor; a client exposing no scope while
    ///    scoped rules are declared is a programming error, not a
    ///    recoverable validation failure.
    /// 5. The execution function runs; its result and error are
    ///    propagated verbatim.
    pub fn run(&self, client: &dyn Client, params: Value) -> Result<Value, CommandError> {
        let key = self.key();
        debug!(command = %key, "dispatching");

        let params = match &self.pre_params_hook {
            Some(hook) => (**hook)(self, client, params)?,
            None => params,
        };

        if !self.params.is_empty() {
            let carrier = Carrier::synthesize(&self.params, &params);
            carrier.validate_with(self.tag_validator.as_ref())?;
            debug!(command = %key, "structural validation passed");
        }

        let params = match &self.pre_rules_hook {
            Some(hook) => (**hook)(self, client, params)?,
            None => params,
        };

        if !self.rules.is_empty() {
            let scope = client.current_scope();
            if scope.is_none() && self.rules.iter().any(|r| !r.scopes.is_empty()) {
                return Err(CommandError::Programming(format!(
                    "client for \"{key}\" exposes no active scope but scoped rules are declared",
                )));
            }
            evaluate_rules(&self.rules, &params, scope.as_ref())?;
            debug!(command = %key, "business rules passed");
        }

        let Some(exec) = &self.exec else {
            return Err(CommandError::Programming(format!(
                "command \"{key}\" has no execution function",
            )));
        };
        (**exec)(self, client, params)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("namespace", &self.namespace)
            .field("resource", &self.resource)
            .field("verb", &self.verb)
            .field("params", &self.params.len())
            .field("rules", &self.rules.len())
            .field("hidden", &self.hidden)
            .field("deprecated", &self.deprecated)
            .finish_non_exhaustive()
    }
}
