//! Catalogue of the available backdrop animations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::surface::SurfaceEffect;

/// Backdrop animation selectable from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    Metaball,
    Mesh,
    Chaser,
    Flag,
    Parallax,
    Square,
}

impl AnimationKind {
    /// Menu order.
    pub const ALL: [AnimationKind; 6] = [
        AnimationKind::Metaball,
        AnimationKind::Mesh,
        AnimationKind::Chaser,
        AnimationKind::Flag,
        AnimationKind::Parallax,
        AnimationKind::Square,
    ];

    pub fn class_name(self) -> &'static str {
        match self {
            AnimationKind::Metaball => "Metaball",
            AnimationKind::Mesh => "Mesh",
            AnimationKind::Chaser => "Chaser",
            AnimationKind::Flag => "Flag",
            AnimationKind::Parallax => "Parallax",
            AnimationKind::Square => "Square",
        }
    }

    /// Short label shown in the menu.
    pub fn description(self) -> &'static str {
        match self {
            AnimationKind::Metaball => "coffee cream",
            AnimationKind::Mesh => "mesh background",
            AnimationKind::Chaser => "flocking background",
            AnimationKind::Flag => "waving dots",
            AnimationKind::Parallax => "parallax hexagons",
            AnimationKind::Square => "floating squares",
        }
    }

    /// Surface post-processing installed while this animation runs.
    pub fn effect(self) -> SurfaceEffect {
        match self {
            AnimationKind::Metaball => SurfaceEffect::Goo,
            _ => SurfaceEffect::None,
        }
    }

    /// Position in [`ALL`](Self::ALL).
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }

    /// Menu entry for a zero-based index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Cycle to the next animation in menu order.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// How many particles each animation is populated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleCounts {
    pub metaball: usize,
    pub mesh: usize,
    pub chaser: usize,
    /// Chasers converted into attractors the rest of the flock follows.
    pub rabbits: usize,
    pub parallax: usize,
    pub square: usize,
}

impl Default for ParticleCounts {
    fn default() -> Self {
        Self {
            metaball: 100,
            mesh: 50,
            chaser: 100,
            rabbits: 3,
            parallax: 30,
            square: 20,
        }
    }
}

/// Returned for an unknown animation name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown animation `{0}`")]
pub struct AnimationParseError(pub String);

impl FromStr for AnimationKind {
    type Err = AnimationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.class_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AnimationParseError(s.to_string()))
    }
}
