//! Pruning and rewriting output with filters.
//!
//! Run with: cargo run --example filters

use serde_flatpath::{
    flatten_with, impl_inspect, Filter, FilterChain, FilterError, FlattenOptions, FnFilter,
    NodeContext, PathFilter,
};
use std::error::Error;

struct Credentials {
    user: String,
    password: String,
}
impl_inspect!(Credentials { user, password });

struct Service {
    name: String,
    replicas: u16,
    credentials: Credentials,
    endpoints: Vec<String>,
}
impl_inspect!(Service { name, replicas, credentials, endpoints });

/// Masks every leaf that lives under a `Credentials` value.
struct MaskSecrets;

impl Filter for MaskSecrets {
    fn format(&self, ctx: &NodeContext<'_>, value: String) -> Result<String, FilterError> {
        if ctx.member_name == Some("password") && ctx.has_ancestor_type("Credentials") {
            Ok("********".to_string())
        } else {
            Ok(value)
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let service = Service {
        name: "billing".to_string(),
        replicas: 3,
        credentials: Credentials {
            user: "svc".to_string(),
            password: "hunter2".to_string(),
        },
        endpoints: vec!["10.0.0.1:80".to_string(), "10.0.0.2:80".to_string()],
    };

    let only_endpoints = PathFilter::new().include("endpoints");
    let map = flatten_with(&service, FlattenOptions::default(), Some(&only_endpoints))?;
    println!("Only endpoints:\n{}\n", map);

    let first_endpoint = FnFilter::new().descend(|ctx| ctx.index.map_or(true, |i| i == 0));
    let chain = FilterChain::new()
        .with(MaskSecrets)
        .with(first_endpoint)
        .with(FnFilter::new().format(|ctx, raw| {
            if ctx.path == "replicas" {
                format!("{} pods", raw)
            } else {
                raw
            }
        }));
    let map = flatten_with(&service, FlattenOptions::default(), Some(&chain))?;
    println!("Masked:\n{}\n", map);

    let strict = FnFilter::new().try_format(|ctx, raw| {
        if raw.contains("hunter") {
            Err(format!("secret leaked at {}", ctx.path).into())
        } else {
            Ok(raw)
        }
    });
    match flatten_with(&service, FlattenOptions::default(), Some(&strict)) {
        Ok(_) => println!("no secrets found"),
        Err(err) => println!("Aborted: {}", err),
    }

    Ok(())
}
