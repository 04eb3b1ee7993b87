use super::*;
use crate::dependency::runner::fake::FakeRunner;
use crate::fs::mock::MockFs;
use crate::fs::FileSystem;
use crate::http::fake::FakeHttpClient;
use crate::prompt::mock::{Answer, ScriptedPrompter};
use serial_test::serial;

const CONFIG: &str = r#"{
  "$schema": "https://haberui.com/schema.json",
  "style": "tailwind",
  "tailwind": true,
  "componentDir": "components/haber-ui",
  "importPath": "@/components/haber-ui",
  "registry": "https://haberui.com/h"
}"#;

const THINKING_STATE: &str = r#"{
  "name": "thinking-state",
  "version": "0.1.0",
  "files": [{ "path": "thinking-state.tsx", "content": "export function ThinkingState() {}", "type": "components:ui" }]
}"#;

struct Harness {
    fs: MockFs,
    http: FakeHttpClient,
    runner: FakeRunner,
    prompter: ScriptedPrompter,
}

impl Harness {
    fn new() -> Self {
        let fs = MockFs::new();
        fs.add_file("/project/haber.json", CONFIG);
        Self {
            fs,
            http: FakeHttpClient::new(),
            runner: FakeRunner::new(),
            prompter: ScriptedPrompter::silent(),
        }
    }

    fn context(&self) -> Context<'_> {
        Context {
            fs: &self.fs,
            http: &self.http,
            runner: &self.runner,
            prompter: &self.prompter,
            cwd: PathBuf::from("/project"),
        }
    }

    async fn add(&self, args: Args) -> Result<AddOutcome> {
        execute(&args, &self.context(), &Spinner::hidden()).await
    }
}

fn args(component: Option<&str>) -> Args {
    Args {
        component: component.map(str::to_string),
        yes: false,
        overwrite: false,
        strict: false,
    }
}

fn added(outcome: AddOutcome) -> AddedComponent {
    match outcome {
        AddOutcome::Added(added) => added,
        AddOutcome::Cancelled => panic!("expected Added"),
    }
}

// =========================================================================
// execute
// =========================================================================

#[tokio::test]
async fn test_add_without_config_is_not_initialized() {
    let harness = Harness::new();
    harness.fs.remove_file(Path::new("/project/haber.json")).unwrap();

    let result = harness.add(args(Some("thinking-state"))).await;

    assert!(matches!(result, Err(HaberError::NotInitialized(_))));
    assert_eq!(harness.http.request_count(), 0);
}

#[tokio::test]
async fn test_add_from_local_registry() {
    let harness = Harness::new();
    harness
        .fs
        .add_file("/project/public/h/thinking-state.json", THINKING_STATE);

    let added = added(harness.add(args(Some("thinking-state"))).await.unwrap());

    assert_eq!(added.import_path, "@/components/haber-ui/thinking-state");
    assert_eq!(
        added.written,
        vec![PathBuf::from("/project/components/haber-ui/thinking-state.tsx")]
    );
    assert_eq!(
        harness
            .fs
            .file("/project/components/haber-ui/thinking-state.tsx")
            .as_deref(),
        Some("export function ThinkingState() {}")
    );
    assert_eq!(harness.http.request_count(), 0);
}

#[tokio::test]
#[serial]
async fn test_add_from_remote_registry() {
    let mut harness = Harness::new();
    harness.http =
        FakeHttpClient::new().respond("https://haberui.com/h/thinking-state.json", 200, THINKING_STATE);

    let added = added(harness.add(args(Some("thinking-state"))).await.unwrap());

    assert_eq!(added.component.version, "0.1.0");
}

#[tokio::test]
#[serial]
async fn test_add_nonexistent_component_writes_nothing() {
    let harness = Harness::new();

    let result = harness.add(args(Some("nonexistent"))).await;

    assert!(matches!(result, Err(HaberError::ComponentNotFound(ref name)) if name == "nonexistent"));
    assert_eq!(harness.fs.file_paths(), vec!["/project/haber.json"]);
}

#[tokio::test]
async fn test_add_prompts_for_missing_name() {
    let mut harness = Harness::new();
    harness
        .fs
        .add_file("/project/public/h/thinking-state.json", THINKING_STATE);
    harness.prompter = ScriptedPrompter::new([Answer::Input("Thinking-State".to_string())]);

    let added = added(harness.add(args(None)).await.unwrap());

    assert_eq!(added.component.name, "thinking-state");
    assert_eq!(harness.prompter.asked().len(), 1);
}

#[tokio::test]
async fn test_add_rejects_invalid_name() {
    let harness = Harness::new();

    let result = harness.add(args(Some("../haber"))).await;

    assert!(matches!(result, Err(HaberError::InvalidComponentName { .. })));
}

#[tokio::test]
async fn test_add_existing_target_prompts_and_cancel_keeps_file() {
    let mut harness = Harness::new();
    harness
        .fs
        .add_file("/project/public/h/thinking-state.json", THINKING_STATE);
    harness
        .fs
        .add_file("/project/components/haber-ui/thinking-state.tsx", "local edits");
    harness.prompter = ScriptedPrompter::new([Answer::Confirm(false)]);

    let outcome = harness.add(args(Some("thinking-state"))).await.unwrap();

    assert!(matches!(outcome, AddOutcome::Cancelled));
    assert_eq!(
        harness.prompter.asked(),
        vec!["Component thinking-state already exists. Overwrite?"]
    );
    assert_eq!(
        harness
            .fs
            .file("/project/components/haber-ui/thinking-state.tsx")
            .as_deref(),
        Some("local edits")
    );
}

#[tokio::test]
async fn test_add_existing_target_prompt_confirmed() {
    let mut harness = Harness::new();
    harness
        .fs
        .add_file("/project/public/h/thinking-state.json", THINKING_STATE);
    harness
        .fs
        .add_file("/project/components/haber-ui/thinking-state.tsx", "local edits");
    harness.prompter = ScriptedPrompter::new([Answer::Confirm(true)]);

    added(harness.add(args(Some("thinking-state"))).await.unwrap());

    assert_eq!(
        harness
            .fs
            .file("/project/components/haber-ui/thinking-state.tsx")
            .as_deref(),
        Some("export function ThinkingState() {}")
    );
}

#[tokio::test]
async fn test_add_existing_target_with_flags_skips_prompt() {
    for (yes, overwrite) in [(true, false), (false, true)] {
        let harness = Harness::new();
        harness
            .fs
            .add_file("/project/public/h/thinking-state.json", THINKING_STATE);
        harness
            .fs
            .add_file("/project/components/haber-ui/thinking-state.tsx", "local edits");

        let outcome = harness
            .add(Args {
                yes,
                overwrite,
                ..args(Some("thinking-state"))
            })
            .await
            .unwrap();

        assert!(matches!(outcome, AddOutcome::Added(_)));
        assert!(harness.prompter.asked().is_empty());
    }
}

#[tokio::test]
async fn test_add_installs_dependencies_before_writing() {
    let harness = Harness::new();
    harness.fs.add_file("/project/components.json", "{}");
    harness.fs.add_file(
        "/project/public/h/ai-chat.json",
        r#"{
          "name": "ai-chat",
          "registryDependencies": ["button", "thinking-state"],
          "dependencies": ["lucide-react"],
          "files": [{ "path": "ai-chat.tsx", "content": "chat", "type": "components:ui" }]
        }"#,
    );
    harness
        .fs
        .add_file("/project/public/h/thinking-state.json", THINKING_STATE);

    let added = added(harness.add(args(Some("ai-chat"))).await.unwrap());

    assert_eq!(
        added.report.installed,
        vec!["button", "thinking-state", "lucide-react"]
    );
    assert_eq!(
        harness.runner.commands(),
        vec!["npx shadcn@latest add button --yes", "npm install lucide-react"]
    );
    assert!(harness
        .fs
        .file("/project/components/haber-ui/thinking-state.tsx")
        .is_some());
    assert!(harness
        .fs
        .file("/project/components/haber-ui/ai-chat.tsx")
        .is_some());
}

#[tokio::test]
#[serial]
async fn test_add_strict_fails_on_missing_dependency() {
    let harness = Harness::new();
    harness.fs.add_file(
        "/project/public/h/ai-chat.json",
        r#"{ "name": "ai-chat", "registryDependencies": ["ghost"], "files": [{ "path": "ai-chat.tsx", "content": "chat" }] }"#,
    );

    let result = harness
        .add(Args {
            strict: true,
            ..args(Some("ai-chat"))
        })
        .await;

    assert!(matches!(result, Err(HaberError::ComponentNotFound(ref name)) if name == "ghost"));
    assert!(harness
        .fs
        .file("/project/components/haber-ui/ai-chat.tsx")
        .is_none());
}

#[tokio::test]
async fn test_add_rejects_descriptor_escaping_component_dir() {
    let harness = Harness::new();
    harness.fs.add_file(
        "/project/public/h/evil.json",
        r#"{ "name": "evil", "files": [{ "path": "../../package.json", "content": "{}" }] }"#,
    );

    let result = harness.add(args(Some("evil"))).await;

    assert!(matches!(result, Err(HaberError::UnsafePath(_))));
    assert_eq!(
        harness.fs.file_paths(),
        vec!["/project/haber.json", "/project/public/h/evil.json"]
    );
}

// =========================================================================
// 出力ヘルパー
// =========================================================================

#[test]
fn test_completion_message_counts_failures() {
    let mut report = InstallReport::default();
    let clean = completion_message("ai-chat", &report);
    assert!(clean.contains("ai-chat"));
    assert!(!clean.contains("failed"));

    report.failures.push(crate::dependency::DependencyFailure {
        dependency: "zod".to_string(),
        recovery: "npm install zod".to_string(),
        reason: "exit 1".to_string(),
    });
    assert!(completion_message("ai-chat", &report).ends_with("(1 dependency failed)"));

    report.failures.push(report.failures[0].clone());
    assert!(completion_message("ai-chat", &report).ends_with("(2 dependencies failed)"));
}

#[test]
fn test_pascal_case() {
    assert_eq!(pascal_case("thinking-state"), "ThinkingState");
    assert_eq!(pascal_case("ai-parameter-controls"), "AiParameterControls");
    assert_eq!(pascal_case("token_counter"), "TokenCounter");
    assert_eq!(pascal_case("button"), "Button");
}

#[test]
fn test_import_statement() {
    assert_eq!(
        import_statement("thinking-state", "@/components/haber-ui/thinking-state"),
        r#"import { ThinkingState } from "@/components/haber-ui/thinking-state""#
    );
}

#[test]
fn test_css_vars_block() {
    let mut css_vars = CssVars::default();
    css_vars
        .light
        .insert("--haber-accent".to_string(), "262 83% 58%".to_string());
    css_vars
        .dark
        .insert("haber-accent".to_string(), "263 70% 50%".to_string());

    assert_eq!(
        css_vars_block(&css_vars),
        ":root {\n  --haber-accent: 262 83% 58%;\n}\n\n.dark {\n  --haber-accent: 263 70% 50%;\n}"
    );
}

#[test]
fn test_css_vars_block_light_only() {
    let mut css_vars = CssVars::default();
    css_vars.light.insert("--a".to_string(), "1".to_string());

    assert_eq!(css_vars_block(&css_vars), ":root {\n  --a: 1;\n}");
}
