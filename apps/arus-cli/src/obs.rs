use std::net::SocketAddr;

/// One-shot startup wiring: tracing subscriber first, then the optional
/// metrics endpoint, so exporter failures are logged.
pub fn init(log_level: &str, log_format: &str, metrics_addr: Option<&str>) -> Result<(), String> {
    init_tracing(log_level, log_format)?;
    serve_metrics(metrics_addr)
}

fn init_tracing(log_level: &str, log_format: &str) -> Result<(), String> {
    let directives = std::env::var("ARUS_LOG").unwrap_or_else(|_| log_level.to_string());
    let filter = tracing_subscriber::EnvFilter::try_new(&directives)
        .map_err(|err| format!("invalid log filter '{}': {}", directives, err))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_format.trim().to_lowercase().as_str() {
        "json" => builder.json().init(),
        "text" => builder.init(),
        other => {
            return Err(format!(
                "unsupported log format '{}' (expected text or json)",
                other
            ))
        }
    }
    Ok(())
}

#[cfg(feature = "prometheus")]
fn serve_metrics(metrics_addr: Option<&str>) -> Result<(), String> {
    let Some(raw) = metrics_addr else {
        return Ok(());
    };
    let addr: SocketAddr = raw
        .parse()
        .map_err(|err| format!("invalid --metrics-addr '{}': {}", raw, err))?;

    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|err| format!("failed to start metrics endpoint on {}: {}", addr, err))?;

    tracing::info!(%addr, "metrics endpoint listening");
    Ok(())
}

#[cfg(not(feature = "prometheus"))]
fn serve_metrics(metrics_addr: Option<&str>) -> Result<(), String> {
    match metrics_addr {
        Some(_) => {
            Err("this build has no metrics exporter (enable the `prometheus` feature)".to_string())
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::init_tracing;

    // Both failure paths return before a subscriber is installed, so the
    // tests stay independent of global state.

    #[test]
    fn rejects_unparseable_log_filter() {
        let err = init_tracing("not==a==filter", "text").unwrap_err();
        assert!(err.contains("invalid log filter"));
    }

    #[test]
    fn rejects_unknown_log_format() {
        let err = init_tracing("info", "yaml").unwrap_err();
        assert!(err.contains("unsupported log format 'yaml'"));
    }
}
