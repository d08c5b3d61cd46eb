//! Daemon entry point: loads a System's configuration, builds the
//! registry, and spawns one LACP port actor per configured port (§5, §6).

mod mac;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use control_plane::asic::InProcessAsic;
use control_plane::event_bus::{ControlEvent, EventBusHandle};
use control_plane::ids::{AggregatorId, PortId};
use control_plane::port::{LacpPort, PortMode as CpPortMode, PortTimeout as CpPortTimeout};
use control_plane::registry::{Registry, SystemIdentity};
use control_plane::rstp::port::RstpPort;
use control_plane::system::LacpPortActor;
use control_plane::{Aggregator, RstpBridgeActor, RstpBusHandle};
use config::{LacpdConfig, PortMode, PortTimeout};
use pdu_codec::bpdu::BridgeId;
use tracing_subscriber::EnvFilter;

use crate::mac::parse_mac;

#[derive(Parser, Debug)]
#[command(name = "lacpd", about = "LACP/RSTP control-plane daemon")]
struct Args {
    /// Path to a YAML or TOML system configuration file.
    #[arg(long)]
    config: std::path::PathBuf,

    /// Parse `--config` as TOML instead of YAML.
    #[arg(long)]
    toml: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = if args.toml {
        LacpdConfig::from_toml_file(&args.config)
    } else {
        LacpdConfig::from_yaml_file(&args.config)
    }
    .with_context(|| format!("loading {}", args.config.display()))?;

    let registry = Arc::new(build_registry(&config)?);
    // No real ASIC backend is wired up yet; the in-process recorder stands
    // in for one until a netlink/switchdev adapter lands (§4.12).
    let asic = Arc::new(InProcessAsic::new());

    let mut handles: Vec<(PortId, EventBusHandle, tokio::task::JoinHandle<()>)> = Vec::new();
    for port_config in &config.ports {
        let id = PortId(port_config.id);
        let (actor, handle) = LacpPortActor::new(id, registry.clone(), asic.clone());
        let task = tokio::spawn(actor.run());
        handles.push((id, handle, task));
    }

    for (id, handle, _) in &handles {
        let enabled = config
            .ports
            .iter()
            .find(|p| PortId(p.id) == *id)
            .map(|p| p.enabled)
            .unwrap_or(false);
        handle.send_control(ControlEvent::PortEnabled(enabled)).await;
    }

    let (rstp_handle, rstp_task): (Option<RstpBusHandle>, Option<tokio::task::JoinHandle<()>>) = if config
        .ports
        .iter()
        .any(|p| p.rstp.is_some())
    {
        let (actor, handle) = RstpBridgeActor::new(registry.clone(), asic.clone());
        let task = tokio::spawn(actor.run());
        for port_config in &config.ports {
            if let Some(rstp) = &port_config.rstp {
                handle.set_port_enabled(PortId(port_config.id), rstp.enabled && port_config.enabled).await;
            }
        }
        (Some(handle), Some(task))
    } else {
        (None, None)
    };

    tracing::info!(ports = handles.len(), rstp = rstp_handle.is_some(), "lacpd running");

    tokio::signal::ctrl_c().await.context("waiting for shutdown signal")?;
    tracing::info!("shutdown signal received, tearing down port actors");

    for (_, handle, task) in handles {
        handle.kill().await;
        let _ = tokio::time::timeout(std::time::Duration::from_secs(2), task).await;
    }
    if let (Some(handle), Some(task)) = (rstp_handle, rstp_task) {
        handle.kill().await;
        let _ = tokio::time::timeout(std::time::Duration::from_secs(2), task).await;
    }

    Ok(())
}

fn build_registry(config: &LacpdConfig) -> Result<Registry> {
    let registry = Registry::new();

    if let Some(system) = &config.system {
        registry.set_system(SystemIdentity {
            mac: parse_mac(&system.mac)?,
            priority: system.priority,
            enabled: system.enabled,
        });
    }

    for agg_config in &config.aggregators {
        let mac = config
            .system
            .as_ref()
            .map(|s| parse_mac(&s.mac))
            .transpose()?
            .unwrap_or_default();
        let mut agg = Aggregator::new(AggregatorId(agg_config.id), agg_config.name.clone(), agg_config.key, mac, agg_config.min_links);
        agg.hash_mode = agg_config.hash_mode;
        registry
            .add_aggregator(agg)
            .map_err(|e| anyhow::anyhow!("{e}"))?;
    }

    for port_config in &config.ports {
        let mode = match port_config.mode {
            PortMode::Active => CpPortMode::Active,
            PortMode::Passive => CpPortMode::Passive,
        };
        let mut port = LacpPort::new(PortId(port_config.id), port_config.priority, port_config.key, mode, parse_mac(&port_config.mac)?);
        port.admin_timeout = match port_config.timeout {
            PortTimeout::Short => CpPortTimeout::Short,
            PortTimeout::Long => CpPortTimeout::Long,
        };
        port.admin_enabled = port_config.enabled;
        port.interface = port_config.interface.clone();
        registry.add_port(port).map_err(|e| anyhow::anyhow!("{e}"))?;
    }

    if let Some(rstp_bridge) = &config.rstp {
        let mac = config.system.as_ref().map(|s| parse_mac(&s.mac)).transpose()?.unwrap_or_default();
        let bridge_id = BridgeId { priority: rstp_bridge.priority, address: mac };
        registry.set_bridge_id(bridge_id);
        for port_config in &config.ports {
            if let Some(rstp_port) = &port_config.rstp {
                let mut port = RstpPort::new(PortId(port_config.id), port_config.id as u32, bridge_id);
                port.priority = rstp_port.priority;
                port.admin_edge = rstp_port.admin_edge;
                if let Some(cost) = rstp_port.path_cost {
                    port.path_cost = cost;
                }
                registry.add_rstp_port(port).map_err(|e| anyhow::anyhow!("{e}"))?;
            }
        }
    }

    Ok(registry)
}
