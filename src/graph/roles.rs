//! Naming-convention roles ("Page", "React Hook", "Test", ...).

use std::collections::BTreeMap;

use regex::Regex;

use crate::ingest::language::{detect_language, is_source_language};
use crate::models::file::FileRecord;

/// Role for source files no rule matched.
pub const MODULE_ROLE: &str = "Module";
/// Role for everything else.
pub const FILE_ROLE: &str = "File";

/// Ordered `(pattern, role)` rules. First match wins.
const RULES: &[(&str, &str)] = &[
    // Entry layouts
    (r"(?i)(^|/)layout\.(tsx|jsx|ts|js|vue|svelte)$", "Layout"),
    (r"(?i)(^|/)\+layout\.svelte$", "Layout"),
    (r"(?i)(^|/)_app\.(tsx|jsx|ts|js)$", "App Layout"),
    (r"(?i)(^|/)_document\.(tsx|jsx|ts|js)$", "Document Layout"),
    (r"(?i)(^|/)layouts/[^/]+\.(tsx|jsx|ts|js|vue|svelte)$", "Layout"),
    // Route handlers
    (r"(?i)(^|/)route\.(ts|js)$", "API Route"),
    (r"(?i)(^|/)pages/api/", "API Route"),
    (r"(?i)(^|/)\+server\.(ts|js)$", "API Route"),
    (r"(?i)(^|/)page\.(tsx|jsx|ts|js|mdx)$", "Page"),
    (r"(?i)(^|/)\+page\.svelte$", "Page"),
    (r"(?i)(^|/)pages/[^.]+\.(tsx|jsx|ts|js|vue)$", "Page"),
    (r"(?i)(^|/)loading\.(tsx|jsx)$", "Loading UI"),
    (r"(?i)(^|/)(error|global-error)\.(tsx|jsx)$", "Error Boundary"),
    (r"(?i)(^|/)not-found\.(tsx|jsx)$", "Not Found Page"),
    (r"(?i)(^|/)(routes?|controllers?|handlers?)/", "Route Handler"),
    // Interception
    (r"(?i)(^|/)middlewares?(\.\w+$|/)", "Middleware"),
    (r"(?i)(^|/)interceptors?(\.\w+$|/)", "Interceptor"),
    // Schemas and definitions
    (r"(?i)\.prisma$", "Database Schema"),
    (r"(?i)\.(graphql|gql|proto)$", "Schema Definition"),
    (r"(?i)(^|/)(schema|schemas)(\.\w+$|/)", "Schema"),
    (r"(?i)(^|/)(models?|entities)/", "Data Model"),
    // Tests
    (r"(?i)\.(test|spec)\.\w+$", "Test"),
    (r"(?i)(^|/)(__tests__|tests?|spec)/", "Test"),
    (r"(?i)(^|/)test_\w+\.py$", "Test"),
    (r"(?i)_test\.(go|py|rb)$", "Test"),
    // Module roots and entry points
    (r"(?i)(^|/)index\.(ts|tsx|js|jsx|mjs|cjs)$", "Module Index"),
    (r"(?i)(^|/)__init__\.py$", "Package Init"),
    (r"(^|/)(mod|lib)\.rs$", "Module Root"),
    (r"(^|/)(main\.(rs|go|py|c|cpp)|__main__\.py)$", "Entry Point"),
    // Hooks, state, providers, components
    (r"(^|/)use[A-Z]\w*\.(ts|tsx|js|jsx)$", "React Hook"),
    (r"(?i)(^|/)hooks/", "React Hook"),
    (r"(?i)(^|/)(store|stores|redux|slices)/", "State Store"),
    (r"(?i)\.(store|slice)\.(ts|js)$", "State Store"),
    (r"(Provider|Context)\.(tsx|jsx|ts|js)$", "Context Provider"),
    (r"(?i)(^|/)(providers|contexts?)/", "Context Provider"),
    (r"(?i)(^|/)components?/", "UI Component"),
    // Manifests and environment before the generic config/docs rules
    (
        r"(^|/)(package\.json|Cargo\.toml|go\.mod|pyproject\.toml|requirements(-\w+)?\.txt|Pipfile|Gemfile|setup\.py|pom\.xml|build\.gradle(\.kts)?|composer\.json|\w+\.csproj)$",
        "Package Manifest",
    ),
    (
        r"(^|/)(package-lock\.json|yarn\.lock|pnpm-lock\.yaml|Cargo\.lock|go\.sum|poetry\.lock|Gemfile\.lock)$",
        "Lockfile",
    ),
    (r"(^|/)\.env(\.[\w.-]+)?$", "Environment Config"),
    // Configuration, types, utilities, constants
    (r"(?i)(^|/)[\w.-]+\.config\.(ts|js|mjs|cjs|json)$", "Configuration"),
    (r"(?i)(^|/)(tsconfig|jsconfig)(\.[\w-]+)?\.json$", "Configuration"),
    (r"(?i)(^|/)(config|configs|settings)(\.\w+$|/)", "Configuration"),
    (r"(?i)\.d\.ts$", "Type Definitions"),
    (r"(?i)(^|/)(types?|typings|interfaces)(\.\w+$|/)", "Type Definitions"),
    (r"(?i)(^|/)(utils?|helpers?|lib)(\.\w+$|/)", "Utility"),
    (r"(?i)(^|/)(constants?|consts)(\.\w+$|/)", "Constants"),
    (r"(?i)\.(css|scss|sass|less)$", "Stylesheet"),
    // Documentation
    (r"(?i)(^|/)(readme|changelog|contributing|license)(\.\w+)?$", "Documentation"),
    (r"(?i)\.(md|mdx|rst|txt|adoc)$", "Documentation"),
    (r"(?i)(^|/)docs?/", "Documentation"),
];

struct RoleRule {
    pattern: Regex,
    role: &'static str,
}

/// Assigns a role label to a path by evaluating ordered rules.
pub struct RoleClassifier {
    rules: Vec<RoleRule>,
}

impl Default for RoleClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleClassifier {
    #[must_use]
    pub fn new() -> Self {
        let rules = RULES
            .iter()
            .map(|(src, role)| RoleRule {
                pattern: Regex::new(src).expect("role pattern must compile"),
                role,
            })
            .collect();
        Self { rules }
    }

    /// Role for one path.
    #[must_use]
    pub fn classify(&self, path: &str) -> &'static str {
        if let Some(rule) = self.rules.iter().find(|r| r.pattern.is_match(path)) {
            return rule.role;
        }
        match detect_language(path) {
            Some(lang) if is_source_language(lang) => MODULE_ROLE,
            _ => FILE_ROLE,
        }
    }

    /// Roles for every file, keyed by path.
    #[must_use]
    pub fn classify_all(&self, files: &[FileRecord]) -> BTreeMap<String, String> {
        files
            .iter()
            .map(|f| (f.path.clone(), self.classify(&f.path).to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(path: &str) -> &'static str {
        RoleClassifier::new().classify(path)
    }

    #[test]
    fn page_and_layout_conventions() {
        assert!(role("app/dashboard/page.tsx").contains("Page"));
        assert!(role("pages/about.tsx").contains("Page"));
        assert!(role("pages/blog/[slug].jsx").contains("Page"));
        assert!(role("src/routes/+page.svelte").contains("Page"));
        assert!(role("app/layout.tsx").contains("Layout"));
        assert!(role("pages/_app.tsx").contains("Layout"));
        assert!(role("src/layouts/Main.vue").contains("Layout"));
    }

    #[test]
    fn route_and_middleware_files() {
        assert_eq!(role("app/api/users/route.ts"), "API Route");
        assert_eq!(role("pages/api/login.ts"), "API Route");
        assert_eq!(role("middleware.ts"), "Middleware");
        assert_eq!(role("server/middleware/auth.js"), "Middleware");
    }

    #[test]
    fn tests_are_recognized() {
        assert_eq!(role("src/button.test.tsx"), "Test");
        assert_eq!(role("pages/home.spec.ts"), "Test");
        assert_eq!(role("tests/test_api.py"), "Test");
        assert_eq!(role("pkg/server_test.go"), "Test");
    }

    #[test]
    fn structural_roles() {
        assert_eq!(role("src/index.ts"), "Module Index");
        assert_eq!(role("pkg/__init__.py"), "Package Init");
        assert_eq!(role("src/hooks/useAuth.ts"), "React Hook");
        assert_eq!(role("src/useTheme.tsx"), "React Hook");
        assert_eq!(role("src/store/cart.ts"), "State Store");
        assert_eq!(role("src/ThemeProvider.tsx"), "Context Provider");
        assert_eq!(role("src/components/Button.tsx"), "UI Component");
        assert_eq!(role("next.config.js"), "Configuration");
        assert_eq!(role("src/types.ts"), "Type Definitions");
        assert_eq!(role("src/global.d.ts"), "Type Definitions");
        assert_eq!(role("src/utils/format.ts"), "Utility");
        assert_eq!(role("src/constants.ts"), "Constants");
        assert_eq!(role("prisma/schema.prisma"), "Database Schema");
    }

    #[test]
    fn docs_manifests_and_env() {
        assert_eq!(role("README.md"), "Documentation");
        assert_eq!(role("docs/guide/setup.md"), "Documentation");
        assert_eq!(role("package.json"), "Package Manifest");
        assert_eq!(role("requirements.txt"), "Package Manifest");
        assert_eq!(role("services/api/Cargo.toml"), "Package Manifest");
        assert_eq!(role(".env"), "Environment Config");
        assert_eq!(role(".env.local"), "Environment Config");
    }

    #[test]
    fn fallbacks() {
        assert_eq!(role("src/engine/solver.rs"), MODULE_ROLE);
        assert_eq!(role("app/billing.py"), MODULE_ROLE);
        assert_eq!(role("assets/logo.png"), FILE_ROLE);
        assert_eq!(role("Makefile"), FILE_ROLE);
    }

    #[test]
    fn classify_all_is_keyed_by_path() {
        let files = vec![FileRecord::new("b.py"), FileRecord::new("a/page.tsx")];
        let roles = RoleClassifier::new().classify_all(&files);
        let keys: Vec<&str> = roles.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a/page.tsx", "b.py"]);
        assert_eq!(roles["a/page.tsx"], "Page");
    }
}
