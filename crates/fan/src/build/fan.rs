//! The whole fan assembly stacked from its part builders.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{
    add_to_side, add_to_top, CentrifugeBuilder, FanCompartmentBuilder, FanMotorHolderBuilder,
    PartBuilder, PenHolderBuilder, PrintParts, SplineConnectorBuilder,
};
use crate::kernel::{KernelResult, Solid};

/// Gap between neighbouring parts on the print bed (mm).
pub const PRINT_GAP: f64 = 2.0;

/// The parts registered in the fan assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    PenHolder,
    Connector,
    Compartment,
    Centrifuge,
    MotorHolder,
}

impl PartKind {
    pub const ALL: [PartKind; 5] = [
        PartKind::PenHolder,
        PartKind::Connector,
        PartKind::Compartment,
        PartKind::Centrifuge,
        PartKind::MotorHolder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartKind::PenHolder => "pen_holder",
            PartKind::Connector => "connector",
            PartKind::Compartment => "compartment",
            PartKind::Centrifuge => "centrifuge",
            PartKind::MotorHolder => "motor_holder",
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PartKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown part '{}'", s))
    }
}

/// Full fan: pen holder, connector, compartment, centrifuge and motor holder.
#[derive(Debug, Clone)]
pub struct FanBuilder {
    pub pen_holder: Rc<PenHolderBuilder>,
    pub connector: Rc<SplineConnectorBuilder>,
    pub compartment: Rc<FanCompartmentBuilder>,
    pub centrifuge: Rc<CentrifugeBuilder>,
    pub motor_holder: Rc<FanMotorHolderBuilder>,
}

impl FanBuilder {
    pub fn new(
        pen_holder: Rc<PenHolderBuilder>,
        connector: Rc<SplineConnectorBuilder>,
        compartment: Rc<FanCompartmentBuilder>,
        centrifuge: Rc<CentrifugeBuilder>,
        motor_holder: Rc<FanMotorHolderBuilder>,
    ) -> Self {
        Self {
            pen_holder,
            connector,
            compartment,
            centrifuge,
            motor_holder,
        }
    }

    pub fn builder(&self, kind: PartKind) -> &dyn PartBuilder {
        match kind {
            PartKind::PenHolder => &*self.pen_holder,
            PartKind::Connector => &*self.connector,
            PartKind::Compartment => &*self.compartment,
            PartKind::Centrifuge => &*self.centrifuge,
            PartKind::MotorHolder => &*self.motor_holder,
        }
    }

    /// Registered part builders, bottom to top.
    pub fn part_builders(&self) -> Vec<(PartKind, &dyn PartBuilder)> {
        PartKind::ALL
            .into_iter()
            .map(|kind| (kind, self.builder(kind)))
            .collect()
    }

    /// Stack only the requested parts, in the given order.
    ///
    /// Returns the stacked scene and the individually built parts.
    pub fn build_selected(&self, kinds: &[PartKind]) -> KernelResult<PrintParts> {
        let mut scene = Solid::empty("fan_selection");
        let mut parts = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let part = self.builder(*kind).build()?;
            add_to_top(&mut scene, &part, None);
            parts.push(part);
        }
        Ok((scene, parts))
    }
}

impl PartBuilder for FanBuilder {
    fn name(&self) -> &'static str {
        "fan"
    }

    fn build(&self) -> KernelResult<Solid> {
        let mut scene = Solid::empty(self.name());

        add_to_top(&mut scene, &self.pen_holder.build()?, None);
        add_to_top(&mut scene, &self.connector.build()?, None);
        let compartment_shift = add_to_top(&mut scene, &self.compartment.build()?, None);

        // The impeller sits inside the housing, not on top of it
        add_to_top(
            &mut scene,
            &self.centrifuge.build()?,
            Some(compartment_shift),
        );
        add_to_top(&mut scene, &self.motor_holder.build()?, None);

        tracing::info!("built fan assembly with {} bodies", scene.body_count());
        Ok(scene)
    }

    /// Print parts of the pen holder, connector, compartment and centrifuge,
    /// laid out side by side along X.
    fn build_for_print(&self) -> KernelResult<PrintParts> {
        let builders: [&dyn PartBuilder; 4] = [
            &*self.pen_holder,
            &*self.connector,
            &*self.compartment,
            &*self.centrifuge,
        ];

        let mut parts = Vec::new();
        for builder in builders {
            let (_, sub_parts) = builder.build_for_print()?;
            parts.extend(sub_parts);
        }

        let mut layout = Solid::empty("fan_print");
        for (i, part) in parts.iter().enumerate() {
            let gap = if i == 0 { None } else { Some(PRINT_GAP) };
            add_to_side(&mut layout, part, None, gap);
        }

        tracing::info!("print layout with {} parts", parts.len());
        Ok((layout, parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_kind_round_trip_names() {
        for kind in PartKind::ALL {
            assert_eq!(kind.as_str().parse::<PartKind>(), Ok(kind));
        }
        assert!("propeller".parse::<PartKind>().is_err());
    }

    #[test]
    fn test_part_kind_serde_name() {
        let json = serde_json::to_string(&PartKind::MotorHolder).unwrap();
        assert_eq!(json, "\"motor_holder\"");
    }
}
