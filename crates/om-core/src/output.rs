//! Output selectors.
//!
//! Each engine family exposes a closed set of outputs. The string keys
//! accepted by [`FromStr`] are the same ones the original parameter table
//! used, so configurations written against it keep parsing.

use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// What a lattice engine should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OutputFlag {
    /// The option value.
    #[default]
    Price,
    /// ∂V/∂S.
    Delta,
    /// ∂²V/∂S².
    Gamma,
    /// ∂V/∂t per calendar day.
    Theta,
    /// Price and all sensitivities.
    All,
}

impl OutputFlag {
    /// `true` if the selector needs sensitivities read off the lattice.
    pub fn needs_greeks(self) -> bool {
        !matches!(self, OutputFlag::Price)
    }

    fn key(self) -> &'static str {
        match self {
            OutputFlag::Price => "price",
            OutputFlag::Delta => "delta",
            OutputFlag::Gamma => "gamma",
            OutputFlag::Theta => "theta",
            OutputFlag::All => "all",
        }
    }
}

impl fmt::Display for OutputFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for OutputFlag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price" => Ok(OutputFlag::Price),
            "delta" => Ok(OutputFlag::Delta),
            "gamma" => Ok(OutputFlag::Gamma),
            "theta" => Ok(OutputFlag::Theta),
            "all" => Ok(OutputFlag::All),
            other => Err(Error::UnsupportedOutputFlag(other.to_string())),
        }
    }
}

/// What the implied trinomial tree should return.
///
/// `*Matrix` variants return a full table, `*Node` variants a single entry
/// addressed by the `step`/`state` pair of the implied-tree parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImpliedTreeOutput {
    /// Up-probability matrix (`UPM`).
    #[cfg_attr(feature = "serde", serde(rename = "UPM"))]
    UpMatrix,
    /// Up-probability at one node (`UPni`).
    #[cfg_attr(feature = "serde", serde(rename = "UPni"))]
    UpNode,
    /// Down-probability matrix (`DPM`).
    #[cfg_attr(feature = "serde", serde(rename = "DPM"))]
    DownMatrix,
    /// Down-probability at one node (`DPni`).
    #[cfg_attr(feature = "serde", serde(rename = "DPni"))]
    DownNode,
    /// Local-volatility matrix (`LVM`).
    #[cfg_attr(feature = "serde", serde(rename = "LVM"))]
    LocalVolMatrix,
    /// Local volatility at one node (`LVni`).
    #[cfg_attr(feature = "serde", serde(rename = "LVni"))]
    LocalVolNode,
    /// Arrow-Debreu price matrix (`ADM`).
    #[cfg_attr(feature = "serde", serde(rename = "ADM"))]
    ArrowDebreuMatrix,
    /// Arrow-Debreu price at one node (`ADni`).
    #[cfg_attr(feature = "serde", serde(rename = "ADni"))]
    ArrowDebreuNode,
    /// European option value on the calibrated tree (`price`).
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "price"))]
    Price,
}

impl ImpliedTreeOutput {
    fn key(self) -> &'static str {
        match self {
            ImpliedTreeOutput::UpMatrix => "UPM",
            ImpliedTreeOutput::UpNode => "UPni",
            ImpliedTreeOutput::DownMatrix => "DPM",
            ImpliedTreeOutput::DownNode => "DPni",
            ImpliedTreeOutput::LocalVolMatrix => "LVM",
            ImpliedTreeOutput::LocalVolNode => "LVni",
            ImpliedTreeOutput::ArrowDebreuMatrix => "ADM",
            ImpliedTreeOutput::ArrowDebreuNode => "ADni",
            ImpliedTreeOutput::Price => "price",
        }
    }
}

impl fmt::Display for ImpliedTreeOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ImpliedTreeOutput {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UPM" => Ok(ImpliedTreeOutput::UpMatrix),
            "UPni" => Ok(ImpliedTreeOutput::UpNode),
            "DPM" => Ok(ImpliedTreeOutput::DownMatrix),
            "DPni" => Ok(ImpliedTreeOutput::DownNode),
            "LVM" => Ok(ImpliedTreeOutput::LocalVolMatrix),
            "LVni" => Ok(ImpliedTreeOutput::LocalVolNode),
            "ADM" => Ok(ImpliedTreeOutput::ArrowDebreuMatrix),
            "ADni" => Ok(ImpliedTreeOutput::ArrowDebreuNode),
            "price" => Ok(ImpliedTreeOutput::Price),
            other => Err(Error::UnsupportedOutputFlag(other.to_string())),
        }
    }
}
