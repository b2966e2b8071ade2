//! Detect phase integration tests
//!
//! Runs the requirement plan builder against real workspaces assembled in
//! temporary directories: published framework-dependent deployments,
//! framework-dependent executables, source projects, and workspaces that
//! are not .NET applications at all.

use dotpack::config::BuildConfiguration;
use dotpack::detect::{Detection, Detector};
use dotpack::plan::BuildPlan;
use dotpack::workspace::{BuildpackYmlParser, JsonRuntimeConfigParser, MsBuildProjectParser};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn detector() -> Detector<JsonRuntimeConfigParser, MsBuildProjectParser, BuildpackYmlParser> {
    Detector::new(
        JsonRuntimeConfigParser::new(),
        MsBuildProjectParser::new(),
        BuildpackYmlParser::new(),
    )
}

fn write_runtime_config(dir: &Path, app_name: &str, runtime_version: &str, aspnet: Option<&str>) {
    let mut frameworks = vec![format!(
        r#"{{ "name": "Microsoft.NETCore.App", "version": "{}" }}"#,
        runtime_version
    )];
    if let Some(aspnet_version) = aspnet {
        frameworks.push(format!(
            r#"{{ "name": "Microsoft.AspNetCore.App", "version": "{}" }}"#,
            aspnet_version
        ));
    }

    let content = format!(
        r#"{{ "runtimeOptions": {{ "frameworks": [{}] }} }}"#,
        frameworks.join(", ")
    );
    fs::write(dir.join(format!("{}.runtimeconfig.json", app_name)), content).unwrap();
}

#[cfg(unix)]
fn write_launcher(dir: &Path, app_name: &str) {
    use std::os::unix::fs::PermissionsExt;

    let launcher = dir.join(app_name);
    fs::write(&launcher, "#!ELF").unwrap();
    let mut perms = fs::metadata(&launcher).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&launcher, perms).unwrap();
}

fn expect_pass(detection: Detection) -> BuildPlan {
    match detection {
        Detection::Pass(plan) => plan,
        Detection::Fail { reason } => panic!("expected detection to pass, failed: {}", reason),
    }
}

#[test]
fn test_framework_dependent_deployment_plan() {
    let workspace = TempDir::new().unwrap();
    write_runtime_config(workspace.path(), "MyApp", "6.0.3", None);

    let detection = detector()
        .detect(workspace.path(), &BuildConfiguration::default())
        .unwrap();
    let plan = expect_pass(detection);

    assert_eq!(plan.names(), vec!["icu", "dotnet-runtime", "dotnet-sdk"]);

    assert_eq!(plan.requires[0].metadata.launch, Some(true));

    let runtime = &plan.requires[1];
    assert_eq!(runtime.metadata.version.as_deref(), Some("6.0.3"));
    assert_eq!(
        runtime.metadata.version_source.as_deref(),
        Some("runtimeconfig.json")
    );
    assert_eq!(runtime.metadata.launch, Some(true));

    let sdk = &plan.requires[2];
    assert_eq!(sdk.metadata.version.as_deref(), Some("6.0.*"));
    assert!(sdk.metadata.launch.is_none());
}

#[test]
#[cfg(unix)]
fn test_framework_dependent_executable_skips_sdk() {
    let workspace = TempDir::new().unwrap();
    write_runtime_config(workspace.path(), "MyApp", "6.0.3", None);
    write_launcher(workspace.path(), "MyApp");

    let detection = detector()
        .detect(workspace.path(), &BuildConfiguration::default())
        .unwrap();
    let plan = expect_pass(detection);

    assert_eq!(plan.names(), vec!["icu", "dotnet-runtime"]);
}

#[test]
fn test_aspnet_descriptor_requires_aspnetcore() {
    let workspace = TempDir::new().unwrap();
    write_runtime_config(workspace.path(), "MyApp", "6.0.3", Some("6.0.3"));

    let detection = detector()
        .detect(workspace.path(), &BuildConfiguration::default())
        .unwrap();
    let plan = expect_pass(detection);

    assert_eq!(
        plan.names(),
        vec!["icu", "dotnet-runtime", "dotnet-sdk", "dotnet-aspnetcore"]
    );

    let aspnet = plan.requires.last().unwrap();
    assert_eq!(aspnet.metadata.version.as_deref(), Some("6.0.3"));
    assert_eq!(
        aspnet.metadata.version_source.as_deref(),
        Some("runtimeconfig.json")
    );
    assert_eq!(aspnet.metadata.launch, Some(true));
}

#[test]
fn test_empty_workspace_is_detection_negative() {
    let workspace = TempDir::new().unwrap();
    fs::write(workspace.path().join("README.md"), "not a .NET app").unwrap();

    let detection = detector()
        .detect(workspace.path(), &BuildConfiguration::default())
        .unwrap();

    match detection {
        Detection::Fail { reason } => {
            assert_eq!(reason, "no *.runtimeconfig.json or project file found");
        }
        Detection::Pass(plan) => panic!("expected detection-negative, got {:?}", plan.names()),
    }
}

#[test]
fn test_source_project_plan() {
    let workspace = TempDir::new().unwrap();
    fs::write(
        workspace.path().join("web-app.csproj"),
        r#"
<Project Sdk="Microsoft.NET.Sdk.Web">
  <PropertyGroup>
    <TargetFramework>net6.0</TargetFramework>
  </PropertyGroup>
  <Target Name="BuildClient" AfterTargets="ComputeFilesToPublish">
    <Exec WorkingDirectory="ClientApp" Command="npm run build" />
  </Target>
</Project>
"#,
    )
    .unwrap();

    let detection = detector()
        .detect(workspace.path(), &BuildConfiguration::default())
        .unwrap();
    let plan = expect_pass(detection);

    assert_eq!(
        plan.names(),
        vec![
            "icu",
            "dotnet-application",
            "dotnet-runtime",
            "dotnet-sdk",
            "dotnet-aspnetcore",
            "node"
        ]
    );

    let runtime = &plan.requires[2];
    assert_eq!(runtime.metadata.version.as_deref(), Some("6.0.0"));
    assert_eq!(
        runtime.metadata.version_source.as_deref(),
        Some("web-app.csproj")
    );

    let sdk = &plan.requires[3];
    assert_eq!(sdk.metadata.version.as_deref(), Some("6.0.*"));

    let node = &plan.requires[5];
    assert!(node.metadata.version.is_none());
    assert_eq!(
        node.metadata.version_source.as_deref(),
        Some("web-app.csproj")
    );
}

#[test]
fn test_published_app_with_project_file_keeps_both_requirement_sets() {
    let workspace = TempDir::new().unwrap();
    write_runtime_config(workspace.path(), "MyApp", "6.0.3", None);
    fs::write(
        workspace.path().join("MyApp.csproj"),
        r#"
<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net6.0</TargetFramework>
  </PropertyGroup>
</Project>
"#,
    )
    .unwrap();

    let detection = detector()
        .detect(workspace.path(), &BuildConfiguration::default())
        .unwrap();
    let plan = expect_pass(detection);

    assert_eq!(
        plan.names(),
        vec![
            "icu",
            "dotnet-runtime",
            "dotnet-sdk",
            "dotnet-application",
            "dotnet-runtime",
            "dotnet-sdk"
        ]
    );
}

#[test]
fn test_live_reload_requires_watchexec() {
    let workspace = TempDir::new().unwrap();
    write_runtime_config(workspace.path(), "MyApp", "6.0.3", None);

    let config = BuildConfiguration {
        live_reload_enabled: true,
        ..Default::default()
    };
    let detection = detector().detect(workspace.path(), &config).unwrap();
    let plan = expect_pass(detection);

    assert_eq!(plan.names()[1], "watchexec");
    assert_eq!(plan.requires[1].metadata.launch, Some(true));
}

#[test]
fn test_buildpack_yml_project_path_re_roots_detection() {
    let workspace = TempDir::new().unwrap();
    fs::write(
        workspace.path().join("buildpack.yml"),
        "dotnet-build:\n  project-path: src/my-app\n",
    )
    .unwrap();
    let project_dir = workspace.path().join("src/my-app");
    fs::create_dir_all(&project_dir).unwrap();
    write_runtime_config(&project_dir, "MyApp", "6.0.3", None);

    let detection = detector()
        .detect(workspace.path(), &BuildConfiguration::default())
        .unwrap();
    let plan = expect_pass(detection);

    assert_eq!(plan.names(), vec!["icu", "dotnet-runtime", "dotnet-sdk"]);
}

#[test]
fn test_explicit_project_path_wins_over_buildpack_yml() {
    let workspace = TempDir::new().unwrap();
    // buildpack.yml points at a directory that does not exist; the explicit
    // configuration must win or detection would error.
    fs::write(
        workspace.path().join("buildpack.yml"),
        "dotnet-build:\n  project-path: gone\n",
    )
    .unwrap();
    let project_dir = workspace.path().join("apps/svc");
    fs::create_dir_all(&project_dir).unwrap();
    write_runtime_config(&project_dir, "Svc", "6.0.3", None);

    let config = BuildConfiguration {
        project_path: Some("apps/svc".to_string()),
        ..Default::default()
    };
    let detection = detector().detect(workspace.path(), &config).unwrap();

    assert!(detection.plan().is_some());
}

#[test]
fn test_detection_output_is_byte_identical_across_runs() {
    let workspace = TempDir::new().unwrap();
    write_runtime_config(workspace.path(), "MyApp", "6.0.3", Some("6.0.3"));

    let config = BuildConfiguration::default();
    let first = detector().detect(workspace.path(), &config).unwrap();
    let second = detector().detect(workspace.path(), &config).unwrap();

    let first_json = serde_json::to_string(first.plan().unwrap()).unwrap();
    let second_json = serde_json::to_string(second.plan().unwrap()).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn test_malformed_descriptor_is_an_error_not_a_skip() {
    let workspace = TempDir::new().unwrap();
    fs::write(
        workspace.path().join("MyApp.runtimeconfig.json"),
        "{ not json",
    )
    .unwrap();

    let result = detector().detect(workspace.path(), &BuildConfiguration::default());

    assert!(result.is_err());
}
