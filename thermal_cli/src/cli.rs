use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thermal_core::calculators::{ExchangerForm, FinForm, LayerForm, LayerList, WallForm};
use thermal_core::config::DEFAULT_CONFIG_FILE;

#[derive(Parser, Debug)]
#[command(name = "thermalsim", version, about = "ThermalSim heat transfer calculators")]
pub struct Cli {
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE, help = "Configuration file (TOML)")]
    pub config: PathBuf,
    #[arg(long, global = true, help = "Backend base URL, overrides the configuration")]
    pub base_url: Option<String>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Composite wall conduction
    Wall {
        #[command(flatten)]
        wall: WallArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Straight fin with adiabatic tip
    Fin {
        #[command(flatten)]
        fin: FinArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Heat exchanger by the NTU-effectiveness method
    Exchanger {
        #[command(flatten)]
        exchanger: ExchangerArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Interactive composite wall editor
    Shell {
        #[arg(long, help = "Directory for exported reports")]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    #[arg(long, help = "Export a PDF report after a successful calculation")]
    pub export: bool,
    #[arg(long, help = "Directory for exported reports")]
    pub out_dir: Option<PathBuf>,
}

// Field values stay text so the calculators report bad input with their own
// messages.

#[derive(Args, Debug, Clone)]
pub struct WallArgs {
    #[arg(long, allow_hyphen_values = true, default_value = "", help = "Inner surface temperature [K]")]
    pub t_inner: String,
    #[arg(long, allow_hyphen_values = true, default_value = "", help = "Outer surface temperature [K]")]
    pub t_outer: String,
    #[arg(long = "layer", value_parser = parse_layer, help = "Layer as THICKNESS,K,AREA (repeatable)")]
    pub layers: Vec<LayerForm>,
}

impl WallArgs {
    pub fn to_form(&self) -> WallForm {
        WallForm {
            t_inner: self.t_inner.clone(),
            t_outer: self.t_outer.clone(),
            layers: self.layers.iter().cloned().collect::<LayerList>(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct FinArgs {
    #[arg(long, allow_hyphen_values = true, default_value = "", help = "Fin perimeter P [m]")]
    pub p: String,
    #[arg(long, allow_hyphen_values = true, default_value = "", help = "Cross-sectional area Ac [m^2]")]
    pub ac: String,
    #[arg(long, allow_hyphen_values = true, default_value = "", help = "Fin length L [m]")]
    pub l: String,
    #[arg(long, allow_hyphen_values = true, default_value = "", help = "Thermal conductivity k [W/mK]")]
    pub k: String,
    #[arg(long, allow_hyphen_values = true, default_value = "", help = "Convection coefficient h [W/m^2K]")]
    pub h_conv: String,
    #[arg(long, allow_hyphen_values = true, default_value = "", help = "Base temperature [K]")]
    pub t_base: String,
    #[arg(long, allow_hyphen_values = true, default_value = "", help = "Ambient temperature [K]")]
    pub t_inf: String,
}

impl FinArgs {
    pub fn to_form(&self) -> FinForm {
        FinForm {
            p: self.p.clone(),
            ac: self.ac.clone(),
            l: self.l.clone(),
            k: self.k.clone(),
            h_conv: self.h_conv.clone(),
            t_base: self.t_base.clone(),
            t_inf: self.t_inf.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExchangerArgs {
    #[arg(long, allow_hyphen_values = true, default_value = "", help = "Hot fluid mass flow rate [kg/s]")]
    pub m_dot_hot: String,
    #[arg(long, allow_hyphen_values = true, default_value = "", help = "Hot fluid specific heat [J/kgK]")]
    pub cp_hot: String,
    #[arg(long, allow_hyphen_values = true, default_value = "", help = "Hot fluid inlet temperature [K]")]
    pub t_in_hot: String,
    #[arg(long, allow_hyphen_values = true, default_value = "", help = "Cold fluid mass flow rate [kg/s]")]
    pub m_dot_cold: String,
    #[arg(long, allow_hyphen_values = true, default_value = "", help = "Cold fluid specific heat [J/kgK]")]
    pub cp_cold: String,
    #[arg(long, allow_hyphen_values = true, default_value = "", help = "Cold fluid inlet temperature [K]")]
    pub t_in_cold: String,
    #[arg(long, allow_hyphen_values = true, default_value = "", help = "Overall conductance UA [W/K]")]
    pub ua: String,
    #[arg(long, default_value = "parallel", help = "parallel or counterflow")]
    pub flow_type: String,
}

impl ExchangerArgs {
    pub fn to_form(&self) -> ExchangerForm {
        ExchangerForm {
            m_dot_hot: self.m_dot_hot.clone(),
            cp_hot: self.cp_hot.clone(),
            t_in_hot: self.t_in_hot.clone(),
            m_dot_cold: self.m_dot_cold.clone(),
            cp_cold: self.cp_cold.clone(),
            t_in_cold: self.t_in_cold.clone(),
            ua: self.ua.clone(),
            flow_type: self.flow_type.clone(),
        }
    }
}

/// `THICKNESS,K,AREA`, each part kept as typed.
pub fn parse_layer(value: &str) -> Result<LayerForm, String> {
    let parts: Vec<&str> = value.split(',').collect();
    match parts.as_slice() {
        [thickness, k_value, area] => Ok(LayerForm::new(*thickness, *k_value, *area)),
        _ => Err(format!("expected THICKNESS,K,AREA, got '{}'", value)),
    }
}
