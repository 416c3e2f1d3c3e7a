use crate::core::PolicyRule;
use crate::rules::{
    BackupRule, CleartextTrafficRule, CustomPermissionsRule, DebuggableRule,
    ExportedComponentsRule, LinkClassificationRule, NetworkSecurityConfigRule, PackageInfoRule,
    RequiredPermissionsRule, UnexportedProvidersRule,
};
use std::sync::Arc;

/// Ordered collection of rules. Order only affects report readability —
/// rules are independent — but it is kept stable so reports are
/// reproducible.
pub struct RuleRegistry {
    rules: Vec<Arc<dyn PolicyRule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The full rule set in audit order.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PackageInfoRule::new());
        registry.register(RequiredPermissionsRule::new());
        registry.register(CustomPermissionsRule::new());
        registry.register(BackupRule::new());
        registry.register(NetworkSecurityConfigRule::new());
        registry.register(DebuggableRule::new());
        registry.register(CleartextTrafficRule::new());
        registry.register(ExportedComponentsRule::new());
        registry.register(UnexportedProvidersRule::new());
        registry.register(LinkClassificationRule::new());
        registry
    }

    pub fn register<R: PolicyRule + 'static>(&mut self, rule: R) {
        self.rules.push(Arc::new(rule));
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn PolicyRule>> {
        self.rules.iter().find(|r| r.id() == id).cloned()
    }

    pub fn all(&self) -> &[Arc<dyn PolicyRule>] {
        &self.rules
    }

    pub fn list_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    pub fn into_rules(self) -> Vec<Arc<dyn PolicyRule>> {
        self.rules
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
