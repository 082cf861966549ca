#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn helper_binary(name: &str) -> PathBuf {
    match name {
        "resolve-providers" => PathBuf::from(env!("CARGO_BIN_EXE_resolve-providers")),
        "provider-lookup" => PathBuf::from(env!("CARGO_BIN_EXE_provider-lookup")),
        other => panic!("unknown helper binary {other}"),
    }
}

/// Command for `name` with the inherited `PROVIDERSCOPE_*` variables removed.
pub fn helper_command(name: &str) -> Command {
    let mut cmd = Command::new(helper_binary(name));
    for var in [
        "PROVIDERSCOPE_CATALOG",
        "PROVIDERSCOPE_ENDPOINTS",
        "PROVIDERSCOPE_CONFIG",
        "PROVIDERSCOPE_CATALOG_SCHEMA",
        "PROVIDERSCOPE_JSON_DEFAULT",
        "PROVIDERSCOPE_JSON_SUPPORT",
        "PROVIDERSCOPE_REACTIVE_PRESENT",
        "PROVIDERSCOPE_CONTRIBUTED",
        "PROVIDERSCOPE_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

pub fn stdout_json(output: &Output) -> Result<Value> {
    serde_json::from_slice(&output.stdout).context("parsing helper stdout as JSON")
}

pub fn write_json(dir: &Path, name: &str, value: &Value) -> Result<PathBuf> {
    let path = dir.join(name);
    let rendered = serde_json::to_string_pretty(value)?;
    fs::write(&path, rendered).with_context(|| format!("writing fixture {}", path.display()))?;
    Ok(path)
}

/// On-disk catalog, manifest and optional config for one scenario.
pub struct Fixture {
    pub dir: TempDir,
    pub catalog: PathBuf,
    pub endpoints: PathBuf,
}

impl Fixture {
    pub fn new(catalog: &Value, endpoints: &Value) -> Result<Self> {
        let dir = TempDir::new().context("allocating fixture dir")?;
        let catalog = write_json(dir.path(), "catalog.json", catalog)?;
        let endpoints = write_json(dir.path(), "endpoints.json", endpoints)?;
        Ok(Self {
            dir,
            catalog,
            endpoints,
        })
    }

    pub fn with_config(&self, config: &Value) -> Result<PathBuf> {
        write_json(self.dir.path(), "config.json", config)
    }
}

/// P1 reads and writes JSON, P2 writes plain text, P3 writes XML.
pub fn sample_catalog() -> Value {
    json!({
        "schema_version": "provider_catalog_v1",
        "description": "integration fixture",
        "providers": [
            {
                "id": "P1",
                "capabilities": ["reader", "writer"],
                "consumes": ["application/json"],
                "produces": ["application/json"]
            },
            {"id": "P2", "capabilities": ["writer"], "produces": ["text/plain"]},
            {"id": "P3", "capabilities": ["writer"], "produces": ["application/xml"]}
        ]
    })
}

pub fn get_endpoint_without_produces() -> Value {
    json!({
        "endpoints": [
            {"verb": "GET", "declaring_type": "acme.Greeting", "method": "hello"}
        ]
    })
}
