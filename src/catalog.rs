//! The fixed list of HVAC sub-assemblies the viewer knows about.
//!
//! Every entry carries a small capability set instead of being special-cased by
//! name elsewhere: stages iterate the catalog and act on the capabilities they
//! understand.

use glam::Vec3;

/// Spin parameters for an entry whose meshes rotate while fan animation is on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotor {
    /// Rotation axis in the asset's own frame.
    pub axis: Vec3,
    /// Radians per second.
    pub angular_speed: f32,
}

/// Telemetry shown in an entry's annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Readings {
    /// Speed and airflow of a fan; zero while the fans are not spinning.
    Rotor { rated_rpm: f32, rated_airflow: f32 },
    /// Fixed sample values, in display order.
    Fixed(&'static [(&'static str, &'static str)]),
}

/// Annotation anchor for an instrumented entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readout {
    /// Name of the sub-node inside the asset that anchors the label.
    pub node: &'static str,
    pub readings: Readings,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Capability {
    Rotatable(Rotor),
    Instrumented(Readout),
}

#[derive(Debug, PartialEq)]
pub struct AssetDescriptor {
    /// Unique catalog key, also the label shown in the part list.
    pub name: &'static str,
    /// Locator handed to the asset provider, relative to the asset root.
    pub source: &'static str,
    pub capabilities: &'static [Capability],
}

impl AssetDescriptor {
    pub fn rotor(&self) -> Option<&Rotor> {
        self.capabilities.iter().find_map(|capability| match capability {
            Capability::Rotatable(rotor) => Some(rotor),
            _ => None,
        })
    }

    pub fn readout(&self) -> Option<&Readout> {
        self.capabilities.iter().find_map(|capability| match capability {
            Capability::Instrumented(readout) => Some(readout),
            _ => None,
        })
    }

    pub fn is_rotatable(&self) -> bool {
        self.rotor().is_some()
    }

    pub fn is_instrumented(&self) -> bool {
        self.readout().is_some()
    }
}

const fn plain(name: &'static str, source: &'static str) -> AssetDescriptor {
    AssetDescriptor {
        name,
        source,
        capabilities: &[],
    }
}

pub static CATALOG: [AssetDescriptor; 16] = [
    plain("DUCT", "DUCT.glb"),
    AssetDescriptor {
        name: "FAN1",
        source: "FAN1.glb",
        capabilities: &[
            Capability::Rotatable(Rotor {
                axis: Vec3::X,
                angular_speed: 2.0,
            }),
            Capability::Instrumented(Readout {
                node: "FAN1_MOTOR",
                readings: Readings::Rotor {
                    rated_rpm: 1450.0,
                    rated_airflow: 3200.0,
                },
            }),
        ],
    },
    AssetDescriptor {
        name: "FAN2",
        source: "FAN2.glb",
        capabilities: &[
            Capability::Rotatable(Rotor {
                axis: Vec3::X,
                angular_speed: 3.0,
            }),
            Capability::Instrumented(Readout {
                node: "FAN2_MOTOR",
                readings: Readings::Rotor {
                    rated_rpm: 1200.0,
                    rated_airflow: 2800.0,
                },
            }),
        ],
    },
    plain("FILTER", "FILTER.glb"),
    plain("HOT", "HOT.glb"),
    plain("COOL", "COOL.glb"),
    plain("HRW", "HRW.glb"),
    plain("DAMPER1", "DAMPER1.glb"),
    plain("DAMPER2", "DAMPER2.glb"),
    plain("DAMPER3", "DAMPER3.glb"),
    plain("DAMPER4", "DAMPER4.glb"),
    plain("DAMPER5", "DAMPER5.glb"),
    plain("PRE-FILTER1", "PRE-FILTER1.glb"),
    plain("PRE-FILTER2", "PRE-FILTER2.glb"),
    AssetDescriptor {
        name: "SENSOR1",
        source: "SENSOR1.glb",
        capabilities: &[Capability::Instrumented(Readout {
            node: "SENSOR1_HEAD",
            readings: Readings::Fixed(&[("Temp", "21.4 °C"), ("RH", "46 %")]),
        })],
    },
    AssetDescriptor {
        name: "SENSOR2",
        source: "SENSOR2.glb",
        capabilities: &[Capability::Instrumented(Readout {
            node: "SENSOR2_HEAD",
            readings: Readings::Fixed(&[("CO2", "612 ppm"), ("ΔP", "118 Pa")]),
        })],
    },
];

pub fn catalog() -> &'static [AssetDescriptor] {
    &CATALOG
}

pub fn find(name: &str) -> Option<&'static AssetDescriptor> {
    CATALOG.iter().find(|descriptor| descriptor.name == name)
}

/// Catalog position of `name`, which is also its draw order.
pub fn position(name: &str) -> Option<usize> {
    CATALOG.iter().position(|descriptor| descriptor.name == name)
}

pub fn rotatable() -> impl Iterator<Item = &'static AssetDescriptor> {
    CATALOG.iter().filter(|descriptor| descriptor.is_rotatable())
}

pub fn instrumented() -> impl Iterator<Item = &'static AssetDescriptor> {
    CATALOG.iter().filter(|descriptor| descriptor.is_instrumented())
}
