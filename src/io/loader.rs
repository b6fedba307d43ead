//! Whitespace-token model-file reader
//!
//! The file is one token stream read strictly in section order: nodes,
//! mechanical material, thermal material, thermal expansion, density,
//! element block, boundary-condition block (terminated by `</BC>`), then
//! the four labelled global scalars α, T₀, Δt, total_t. Numeric sections
//! end at the first token that does not parse as an id, which is how the
//! section labels double as terminators.

use std::fs;
use std::iter::Peekable;
use std::str::SplitAsciiWhitespace;

use nalgebra::Vector3;

use crate::bc::{Axis, BcTables};
use crate::error::SimulationError;
use crate::fem::element::Tet4;
use crate::mechanics::{Hyperelastic, ThermalExpansion};
use crate::mesh::{Mesh, Tet4Element};
use crate::model::Model;
use crate::physics::{Conductivity, ThermalMaterial};

/// Load a model from a text file.
pub fn load_model(path: &str) -> Result<Model, SimulationError> {
    let text = fs::read_to_string(path).map_err(|source| SimulationError::InputOpen {
        path: path.to_string(),
        source,
    })?;
    parse_model(&text, path)
}

struct Tokens<'a> {
    iter: Peekable<SplitAsciiWhitespace<'a>>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            iter: text.split_ascii_whitespace().peekable(),
        }
    }

    fn next_str(&mut self, what: &str) -> Result<&'a str, SimulationError> {
        self.iter.next().ok_or_else(|| {
            SimulationError::Parse(format!("unexpected end of file, expected {what}"))
        })
    }

    fn next_f64(&mut self, what: &str) -> Result<f64, SimulationError> {
        let tok = self.next_str(what)?;
        tok.parse()
            .map_err(|_| SimulationError::Parse(format!("expected {what}, found '{tok}'")))
    }

    fn next_usize(&mut self, what: &str) -> Result<usize, SimulationError> {
        let tok = self.next_str(what)?;
        tok.parse()
            .map_err(|_| SimulationError::Parse(format!("expected {what}, found '{tok}'")))
    }

    /// Consume the next token only if it parses as an unsigned id.
    fn try_next_usize(&mut self) -> Option<usize> {
        let id = self.iter.peek().and_then(|tok| tok.parse().ok())?;
        self.iter.next();
        Some(id)
    }
}

/// Map a file-level id to the internal 0-based index.
fn resolve_index(
    raw: usize,
    begin: usize,
    count: usize,
    what: &str,
) -> Result<usize, SimulationError> {
    raw.checked_sub(begin)
        .filter(|&i| i < count)
        .ok_or_else(|| SimulationError::Parse(format!("{what} id {raw} out of range")))
}

fn parse_model(text: &str, source: &str) -> Result<Model, SimulationError> {
    let mut toks = Tokens::new(text);
    let mut mesh = Mesh::new();

    // Nodes: the first id defines the file's numbering base
    let node_begin_index = toks.next_usize("node id")?;
    {
        let x = toks.next_f64("node x")?;
        let y = toks.next_f64("node y")?;
        let z = toks.next_f64("node z")?;
        mesh.geometry.add_node(x, y, z);
    }
    while toks.try_next_usize().is_some() {
        let x = toks.next_f64("node x")?;
        let y = toks.next_f64("node y")?;
        let z = toks.next_f64("node z")?;
        mesh.geometry.add_node(x, y, z);
    }
    let num_nodes = mesh.num_nodes();

    // Mechanical material
    let material_tag = toks.next_str("mechanical material type")?.to_string();
    let material = match material_tag.as_str() {
        "NH" => {
            let mu = toks.next_f64("shear modulus")?;
            let bulk = toks.next_f64("bulk modulus")?;
            Hyperelastic::neo_hookean(mu, bulk)
        }
        "TI" => {
            let mu = toks.next_f64("shear modulus")?;
            let bulk = toks.next_f64("bulk modulus")?;
            let eta = toks.next_f64("fibre stiffness")?;
            let ax = toks.next_f64("fibre direction x")?;
            let ay = toks.next_f64("fibre direction y")?;
            let az = toks.next_f64("fibre direction z")?;
            Hyperelastic::transversely_isotropic(mu, bulk, eta, Vector3::new(ax, ay, az))
        }
        other => {
            return Err(SimulationError::Parse(format!(
                "unknown mechanical material type '{other}'"
            )))
        }
    };

    // Thermal material; the first parameter is always the specific heat
    let thermal_tag = toks.next_str("thermal material type")?.to_string();
    let specific_heat;
    let conductivity = match thermal_tag.as_str() {
        "T_ISO" => {
            specific_heat = toks.next_f64("specific heat")?;
            let k = toks.next_f64("conductivity")?;
            Conductivity::Isotropic { k }
        }
        "T_ORTHO" => {
            specific_heat = toks.next_f64("specific heat")?;
            let k11 = toks.next_f64("conductivity k11")?;
            let k22 = toks.next_f64("conductivity k22")?;
            let k33 = toks.next_f64("conductivity k33")?;
            Conductivity::Orthotropic { k11, k22, k33 }
        }
        "T_ANISO" => {
            specific_heat = toks.next_f64("specific heat")?;
            let k11 = toks.next_f64("conductivity k11")?;
            let k12 = toks.next_f64("conductivity k12")?;
            let k13 = toks.next_f64("conductivity k13")?;
            let k22 = toks.next_f64("conductivity k22")?;
            let k23 = toks.next_f64("conductivity k23")?;
            let k33 = toks.next_f64("conductivity k33")?;
            Conductivity::anisotropic(k11, k12, k13, k22, k23, k33)
        }
        other => {
            return Err(SimulationError::Parse(format!(
                "unknown thermal material type '{other}'"
            )))
        }
    };
    let thermal = ThermalMaterial::new(specific_heat, conductivity);

    // Thermal expansion; an unrecognized tag (conventionally T_EXPAN_NONE)
    // carries no parameters and disables the expansion split
    let expansion_tag = toks.next_str("thermal expansion type")?.to_string();
    let expansion = match expansion_tag.as_str() {
        "T_EXPAN_ISO" => {
            let alpha = toks.next_f64("expansion coefficient")?;
            Some(ThermalExpansion::isotropic(alpha))
        }
        "T_EXPAN_TI" => {
            let alpha = toks.next_f64("expansion coefficient")?;
            let alpha_m = toks.next_f64("fibre expansion coefficient")?;
            let mx = toks.next_f64("fibre direction x")?;
            let my = toks.next_f64("fibre direction y")?;
            let mz = toks.next_f64("fibre direction z")?;
            Some(ThermalExpansion::transversely_isotropic(
                alpha,
                alpha_m,
                Vector3::new(mx, my, mz),
            ))
        }
        "T_EXPAN_ORTHO" => {
            let alpha = toks.next_f64("expansion coefficient")?;
            let alpha_m = toks.next_f64("m expansion coefficient")?;
            let mx = toks.next_f64("m direction x")?;
            let my = toks.next_f64("m direction y")?;
            let mz = toks.next_f64("m direction z")?;
            let alpha_n = toks.next_f64("n expansion coefficient")?;
            let nx = toks.next_f64("n direction x")?;
            let ny = toks.next_f64("n direction y")?;
            let nz = toks.next_f64("n direction z")?;
            Some(ThermalExpansion::orthotropic(
                alpha,
                alpha_m,
                Vector3::new(mx, my, mz),
                alpha_n,
                Vector3::new(nx, ny, nz),
            ))
        }
        _ => None,
    };

    // Density
    toks.next_str("density label")?;
    let density = toks.next_f64("density")?;

    // Element block
    let element_type = toks.next_str("element type")?.to_string();
    let ele_begin_index = toks.next_usize("element id")?;
    let mut element_nodes: Vec<[usize; 4]> = Vec::new();
    loop {
        let mut nodes = [0usize; 4];
        for slot in &mut nodes {
            let raw = toks.next_usize("element node id")?;
            *slot = resolve_index(raw, node_begin_index, num_nodes, "node")?;
        }
        element_nodes.push(nodes);
        if toks.try_next_usize().is_none() {
            break;
        }
    }

    let mut elements = Vec::with_capacity(element_nodes.len());
    for (id, nodes) in element_nodes.iter().copied().enumerate() {
        let coords = [
            mesh.geometry.nodes[nodes[0]],
            mesh.geometry.nodes[nodes[1]],
            mesh.geometry.nodes[nodes[2]],
            mesh.geometry.nodes[nodes[3]],
        ];
        elements.push(Tet4::new(
            id,
            nodes,
            coords,
            density,
            material.clone(),
            thermal.clone(),
            expansion.clone(),
        )?);
        mesh.connectivity.add_element(Tet4Element::new(nodes));
    }
    let num_elements = elements.len();

    // Boundary-condition block
    let mut bc = BcTables::new(num_nodes);
    loop {
        let tag = toks.next_str("boundary-condition tag")?;
        match tag {
            "</BC>" => break,
            "<Disp>" => {
                let axis_tok = toks.next_str("displacement axis")?;
                let axis = Axis::from_token(axis_tok).ok_or_else(|| {
                    SimulationError::Parse(format!("invalid displacement axis '{axis_tok}'"))
                })?;
                let u = toks.next_f64("displacement magnitude")?;
                while let Some(raw) = toks.try_next_usize() {
                    let node = resolve_index(raw, node_begin_index, num_nodes, "node")?;
                    bc.add_displacement(node, axis, u);
                }
                bc.num_stanzas += 1;
            }
            "<FixP>" => {
                let axis_tok = toks.next_str("fixed-position axis")?;
                if axis_tok == "all" {
                    while let Some(raw) = toks.try_next_usize() {
                        let node = resolve_index(raw, node_begin_index, num_nodes, "node")?;
                        bc.add_fixed_node(node);
                    }
                } else {
                    let axis = Axis::from_token(axis_tok).ok_or_else(|| {
                        SimulationError::Parse(format!("invalid fixed-position axis '{axis_tok}'"))
                    })?;
                    while let Some(raw) = toks.try_next_usize() {
                        let node = resolve_index(raw, node_begin_index, num_nodes, "node")?;
                        bc.add_fixed_dof(node, axis);
                    }
                }
                bc.num_stanzas += 1;
            }
            "<Gravity>" => {
                let axis_tok = toks.next_str("gravity axis")?;
                let axis = Axis::from_token(axis_tok).ok_or_else(|| {
                    SimulationError::Parse(format!("invalid gravity axis '{axis_tok}'"))
                })?;
                let g = toks.next_f64("gravity acceleration")?;
                bc.add_gravity(axis, g, &elements);
                bc.num_stanzas += 1;
            }
            "<HFlux>" => {
                let q = toks.next_f64("heat flux")?;
                while let Some(raw) = toks.try_next_usize() {
                    let node = resolve_index(raw, node_begin_index, num_nodes, "node")?;
                    bc.add_heat_flux(node, q);
                }
                bc.num_stanzas += 1;
            }
            "<Perfu>" => {
                let w_b = toks.next_f64("perfusion rate")?;
                let c_b = toks.next_f64("blood specific heat")?;
                let t_ref = toks.next_f64("perfusion reference temperature")?;
                let mut tet_ids = Vec::new();
                while let Some(raw) = toks.try_next_usize() {
                    tet_ids.push(resolve_index(raw, ele_begin_index, num_elements, "element")?);
                }
                bc.add_perfusion(w_b, c_b, t_ref, &tet_ids, &elements, num_nodes);
                bc.num_stanzas += 1;
            }
            "<FixT>" => {
                let t = toks.next_f64("fixed temperature")?;
                while let Some(raw) = toks.try_next_usize() {
                    let node = resolve_index(raw, node_begin_index, num_nodes, "node")?;
                    bc.add_fixed_temperature(node, t);
                }
                bc.num_stanzas += 1;
            }
            "<BodyHFlux>" => {
                let q = toks.next_f64("body heat flux")?;
                let mut tet_ids = Vec::new();
                while let Some(raw) = toks.try_next_usize() {
                    tet_ids.push(resolve_index(raw, ele_begin_index, num_elements, "element")?);
                }
                bc.add_body_heat_flux(q, &tet_ids, &elements);
                bc.num_stanzas += 1;
            }
            "<Metabo>" => {
                let q = toks.next_f64("metabolic heat")?;
                bc.add_metabolic(q, &elements);
                bc.num_stanzas += 1;
            }
            other => {
                return Err(SimulationError::Parse(format!(
                    "unknown boundary-condition tag '{other}'"
                )))
            }
        }
    }

    // Global scalars, each preceded by a label token
    toks.next_str("damping label")?;
    let damping = toks.next_f64("damping coefficient")?;
    toks.next_str("initial temperature label")?;
    let reference_temperature = toks.next_f64("initial temperature")?;
    toks.next_str("time step label")?;
    let dt = toks.next_f64("time step")?;
    toks.next_str("total time label")?;
    let total_time = toks.next_f64("total time")?;

    if !dt.is_finite() || dt <= 0.0 {
        return Err(SimulationError::Parse(format!(
            "time step must be positive, got {dt}"
        )));
    }
    if !total_time.is_finite() || total_time <= 0.0 {
        return Err(SimulationError::Parse(format!(
            "total time must be positive, got {total_time}"
        )));
    }
    let num_steps = (total_time / dt).ceil() as usize;

    mesh.build_adjacency();

    Ok(Model {
        mesh,
        elements,
        bc,
        density,
        damping,
        reference_temperature,
        specific_heat,
        dt,
        total_time,
        num_steps,
        node_begin_index,
        ele_begin_index,
        element_type,
        material_tag,
        thermal_tag,
        expansion_tag,
        source: source.to_string(),
    })
}
