//! Simulation model: mesh, elements, boundary conditions, and the global
//! scalars of the run. Read-only once loaded; all mutable data lives in the
//! solver state.

use crate::bc::BcTables;
use crate::fem::element::Tet4;
use crate::mesh::Mesh;

#[derive(Debug, Clone)]
pub struct Model {
    pub mesh: Mesh,
    pub elements: Vec<Tet4>,
    pub bc: BcTables,

    /// Material density ρ
    pub density: f64,
    /// Mass-proportional damping coefficient α
    pub damping: f64,
    /// Initial and reference temperature T₀
    pub reference_temperature: f64,
    /// Specific heat capacity c (first thermal parameter)
    pub specific_heat: f64,
    /// Time step Δt
    pub dt: f64,
    /// Simulated time horizon
    pub total_time: f64,
    /// ⌈total_t/Δt⌉
    pub num_steps: usize,

    /// First node id in the input file; ids are shifted to 0-based internally
    pub node_begin_index: usize,
    /// First element id in the input file
    pub ele_begin_index: usize,

    /// Tags echoed in the summary
    pub element_type: String,
    pub material_tag: String,
    pub thermal_tag: String,
    pub expansion_tag: String,
    /// Model file path
    pub source: String,
}

impl Model {
    pub fn num_nodes(&self) -> usize {
        self.mesh.num_nodes()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    pub fn num_mechanical_dofs(&self) -> usize {
        self.num_nodes() * 3
    }

    pub fn num_thermal_dofs(&self) -> usize {
        self.num_nodes()
    }

    /// Print a console summary of the loaded model.
    pub fn print_summary(&self) {
        println!("═══════════════════════════════════════════════════════════════");
        println!("  Coupled Thermo-Elastodynamic Simulation");
        println!("═══════════════════════════════════════════════════════════════");
        println!("Model:          {}", self.source);
        println!(
            "Nodes:          {} ({} DOFs)",
            self.num_nodes(),
            self.num_mechanical_dofs() + self.num_thermal_dofs()
        );
        println!(
            "Elements:       {} ({})",
            self.num_elements(),
            self.element_type
        );
        println!(
            "Materials:      {} / {} / {}",
            self.material_tag, self.thermal_tag, self.expansion_tag
        );
        println!("Density:        {}", self.density);
        println!("BC stanzas:     {}", self.bc.num_stanzas);
        println!("Damping coef.:  {}", self.damping);
        println!("Initial temp.:  {}", self.reference_temperature);
        println!("Time step:      {}", self.dt);
        println!("Total time:     {}", self.total_time);
        println!("Num steps:      {}", self.num_steps);
        println!("\nNode index starts at {}.", self.node_begin_index);
        println!("Elem index starts at {}.", self.ele_begin_index);
        println!("═══════════════════════════════════════════════════════════════");
    }
}
