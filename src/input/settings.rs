//! Reading the detector, sampler and table parameters from a `Config`.
//!
//! Every field is optional and falls back to its default, but a field
//! that is present must parse and be physically sensible.

use crate::detector::Detector;
use crate::geometry::*;
use crate::pe::{Accuracy, Refinement};
use crate::sampler::SamplerSettings;
use crate::table::TableSpec;
use super::{Config, InputError};

/// A single vertex/PMT pair to be probed
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProbeQuery {
    pub vertex: ThreeVector,
    pub pmt: PmtAngles,
}

impl Config {
    /// Reads the `detector` section.
    pub fn detector(&self) -> Result<Detector, InputError> {
        let d = Detector::default();
        let detector = Detector {
            ls_radius: self.read_or("detector:ls_radius", d.ls_radius)?,
            shell_radius: self.read_or("detector:shell_radius", d.shell_radius)?,
            pmt_radius: self.read_or("detector:pmt_radius", d.pmt_radius)?,
            n_water: self.read_or("detector:n_water", d.n_water)?,
            n_ls: self.read_or("detector:n_ls", d.n_ls)?,
            n_glass: self.read_or("detector:n_glass", d.n_glass)?,
            c: d.c,
        };

        if detector.ls_radius <= 0.0 || detector.pmt_radius <= 0.0 {
            return Err(InputError::invalid("detector", "radii must be positive"));
        }
        if detector.ls_radius >= detector.shell_radius - detector.pmt_radius {
            return Err(InputError::invalid("detector:shell_radius", "PMTs must lie entirely outside the LS"));
        }
        if detector.n_water >= detector.n_ls || detector.n_water <= 0.0 || detector.n_glass <= 0.0 {
            return Err(InputError::invalid("detector", "refractive indices must be positive, with n_ls > n_water"));
        }

        Ok(detector)
    }

    /// Reads the `sampler` section.
    pub fn sampler(&self) -> Result<SamplerSettings, InputError> {
        let d = SamplerSettings::default();
        let settings = SamplerSettings {
            trials: self.read_or("sampler:trials", d.trials)?,
            seed: self.read_or("sampler:seed", d.seed)?,
            margin: self.read_or("sampler:margin", d.margin)?,
            search_limit: self.read_or("sampler:search_limit", d.search_limit)?,
            search_steps: self.read_or("sampler:search_steps", d.search_steps)?,
            min_candidates_direct: self.read_or("sampler:min_candidates_direct", d.min_candidates_direct)?,
            min_candidates_reflected: self.read_or("sampler:min_candidates_reflected", d.min_candidates_reflected)?,
        };

        if settings.trials == 0 {
            return Err(InputError::invalid("sampler:trials", "at least one trial ray is needed"));
        }
        if settings.search_steps == 0 {
            return Err(InputError::invalid("sampler:search_steps", "must be positive"));
        }
        if settings.margin < 0.0 || settings.search_limit <= 1.0 {
            return Err(InputError::invalid("sampler", "margin must be non-negative and search_limit greater than one"));
        }

        Ok(settings)
    }

    fn refinement(&self, path: &str, default: Refinement) -> Result<Refinement, InputError> {
        let n: Vec<usize> = self.read_or(path, vec![default.direct, default.reflected])?;
        match n.as_slice() {
            &[direct, reflected] if direct > 0 && reflected > 0 => Ok(Refinement::new(direct, reflected)),
            _ => Err(InputError::invalid(path, "expected two positive integers, [direct, reflected]")),
        }
    }

    /// Reads the `accuracy` section.
    pub fn accuracy(&self) -> Result<Accuracy, InputError> {
        let d = Accuracy::default();
        Ok(Accuracy {
            probability: self.refinement("accuracy:probability", d.probability)?,
            sampling: self.refinement("accuracy:sampling", d.sampling)?,
            grid: self.refinement("accuracy:grid", d.grid)?,
        })
    }

    /// Reads the `table` and `control` sections, returning `None` if
    /// no table is requested.
    pub fn table(&self, detector: &Detector) -> Result<Option<TableSpec>, InputError> {
        if !self.contains("table") {
            return Ok(None);
        }

        let d = TableSpec::default();
        let spec = TableSpec {
            precision: self.read_or("table:precision", d.precision)?,
            min_radius: self.read_or("table:min_radius", d.min_radius)?,
            edge_radius: self.read_or("table:edge_radius", d.edge_radius)?,
            threads: self.read_or("control:threads", d.threads)?,
            progress: self.read_or("control:progress", d.progress)?,
        };

        if spec.threads == 0 {
            return Err(InputError::invalid("control:threads", "at least one worker thread is needed"));
        }
        if spec.precision < 2 {
            return Err(InputError::invalid("table:precision", "must be at least 2"));
        }
        if spec.min_radius < 0.0 || spec.min_radius >= spec.edge_radius || spec.edge_radius >= detector.ls_radius {
            return Err(InputError::invalid("table", "radii must satisfy 0 <= min_radius < edge_radius < ls_radius"));
        }

        Ok(Some(spec))
    }

    /// Reads the optional `probe` section.
    pub fn probe(&self) -> Result<Option<ProbeQuery>, InputError> {
        if !self.contains("probe") {
            return Ok(None);
        }

        let vertex: Vec<f64> = self.read("probe:vertex")?;
        let vertex = match vertex.as_slice() {
            &[x, y, z] => ThreeVector::new(x, y, z),
            _ => return Err(InputError::invalid("probe:vertex", "expected three components, [x, y, z]")),
        };

        let pmt: Vec<f64> = self.read("probe:pmt")?;
        let pmt = match pmt.as_slice() {
            &[phi, theta] => PmtAngles::new(phi, theta),
            _ => return Err(InputError::invalid("probe:pmt", "expected two angles, [phi, theta]")),
        };

        Ok(Some(ProbeQuery {vertex, pmt}))
    }

    /// Name of the file to which the table is written
    pub fn output_file(&self) -> Result<String, InputError> {
        self.read_or("output:file", "probe_table.dat".to_owned())
    }
}
