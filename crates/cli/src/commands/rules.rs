use colored::Colorize;
use tenken_policy::RuleRegistry;

pub fn execute() {
    let registry = RuleRegistry::with_defaults();
    for rule in registry.all() {
        println!(
            "{:<24} {} - {}",
            rule.id().blue(),
            rule.name().bold(),
            rule.description()
        );
    }
}
