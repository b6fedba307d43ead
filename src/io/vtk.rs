//! Legacy VTK 3.8 ASCII export of the simulation results
//!
//! Three UNSTRUCTURED_GRID files are written after the run: the reference
//! mesh, the deformed mesh with the displacement field, and the deformed
//! mesh with the temperature field. Tetrahedra are VTK cell type 10.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::SimulationError;
use crate::fem::state::SolverState;
use crate::model::Model;

/// Which nodal field a file carries
#[derive(Debug, Clone, Copy)]
enum PointData {
    Displacement,
    Temperature,
}

pub struct VtkWriter;

impl VtkWriter {
    /// Write `U.vtk`, `Undeformed.vtk`, and `T.vtk` into `dir`.
    ///
    /// Aborts on the first file that cannot be created or written; nothing
    /// further is attempted after a failure.
    pub fn export_results(
        model: &Model,
        state: &SolverState,
        dir: &Path,
    ) -> Result<(), SimulationError> {
        println!("\n\texporting...");
        for (name, deformed, data) in [
            ("U.vtk", true, PointData::Displacement),
            ("Undeformed.vtk", false, PointData::Displacement),
            ("T.vtk", true, PointData::Temperature),
        ] {
            Self::write_grid(model, state, &dir.join(name), name, deformed, data)?;
            println!("\t\t\t{}", name);
        }
        println!("\tVTK saved.");
        Ok(())
    }

    fn write_grid(
        model: &Model,
        state: &SolverState,
        path: &Path,
        name: &str,
        deformed: bool,
        data: PointData,
    ) -> Result<(), SimulationError> {
        let map_err = |source: io::Error| SimulationError::OutputOpen {
            path: path.display().to_string(),
            source,
        };
        let file = File::create(path).map_err(map_err)?;
        let mut w = BufWriter::new(file);
        Self::write_grid_inner(&mut w, model, state, name, deformed, data).map_err(map_err)?;
        w.flush().map_err(map_err)
    }

    fn write_grid_inner<W: Write>(
        w: &mut W,
        model: &Model,
        state: &SolverState,
        name: &str,
        deformed: bool,
        data: PointData,
    ) -> io::Result<()> {
        let num_nodes = model.num_nodes();
        let num_cells = model.num_elements();

        writeln!(w, "# vtk DataFile Version 3.8")?;
        writeln!(w, "{}", name)?;
        writeln!(w, "ASCII")?;
        writeln!(w, "DATASET UNSTRUCTURED_GRID")?;

        writeln!(w, "POINTS {} double", num_nodes)?;
        for (i, p) in model.mesh.geometry.nodes.iter().enumerate() {
            if deformed {
                writeln!(
                    w,
                    "{} {} {}",
                    p.x + state.curr_u[i * 3],
                    p.y + state.curr_u[i * 3 + 1],
                    p.z + state.curr_u[i * 3 + 2]
                )?;
            } else {
                writeln!(w, "{} {} {}", p.x, p.y, p.z)?;
            }
        }

        writeln!(w, "CELLS {} {}", num_cells, num_cells * 5)?;
        for elem in &model.mesh.connectivity.elements {
            writeln!(
                w,
                "4 {} {} {} {}",
                elem.nodes[0], elem.nodes[1], elem.nodes[2], elem.nodes[3]
            )?;
        }
        writeln!(w, "CELL_TYPES {}", num_cells)?;
        for _ in 0..num_cells {
            writeln!(w, "10")?;
        }

        writeln!(w, "POINT_DATA {}", num_nodes)?;
        match data {
            PointData::Displacement => {
                writeln!(w, "VECTORS {} double", name)?;
                for i in 0..num_nodes {
                    writeln!(
                        w,
                        "{} {} {}",
                        state.curr_u[i * 3],
                        state.curr_u[i * 3 + 1],
                        state.curr_u[i * 3 + 2]
                    )?;
                }
            }
            PointData::Temperature => {
                writeln!(w, "SCALARS {} double", name)?;
                writeln!(w, "LOOKUP_TABLE default")?;
                for i in 0..num_nodes {
                    writeln!(w, "{}", state.curr_t[i])?;
                }
            }
        }
        Ok(())
    }
}
