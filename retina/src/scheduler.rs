use std::ops::Range;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::network::Network;

/// How a tick distributes node updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Schedule {
    Sequential,
    /// One rayon task per grid row.
    #[default]
    RowParallel,
}

impl FromStr for Schedule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Schedule::Sequential),
            "row-parallel" | "row_parallel" | "parallel" => Ok(Schedule::RowParallel),
            other => Err(ConfigError::UnknownSchedule(other.to_string())),
        }
    }
}

/// A span of nodes plus the scratch slices it writes. Spans never overlap,
/// so workers never see each other's in-progress values.
struct RowJob<'a> {
    nodes: Range<usize>,
    next_v: &'a mut [f32],
    next_f: &'a mut [f32],
}

impl Network {
    /// Advance the nodes in `spans` by one tick.
    ///
    /// Two phases:
    /// 1) compute every next potential and filter value from the outputs
    ///    committed at the start of the tick
    /// 2) commit all of them together
    ///
    /// `spans` must be sorted and disjoint; nodes outside them keep their
    /// committed state. `injection`, when given, is indexed by node.
    pub fn step(
        &mut self,
        spans: &[Range<usize>],
        dt: f32,
        injection: Option<&[f32]>,
        schedule: Schedule,
    ) {
        // 0) Snapshot outputs
        let clamp = self.clamp;
        match schedule {
            Schedule::Sequential => {
                for (out, v) in self.snapshot.iter_mut().zip(&self.v) {
                    *out = clamp.apply(*v);
                }
            }
            Schedule::RowParallel => {
                self.snapshot
                    .par_iter_mut()
                    .zip(self.v.par_iter())
                    .for_each(|(out, v)| *out = clamp.apply(*v));
            }
        }

        // 1) Compute into scratch
        let mut next_v = std::mem::take(&mut self.next_v);
        let mut next_f = std::mem::take(&mut self.next_f);
        {
            let mut jobs = self.split_jobs(spans, &mut next_v, &mut next_f);
            let net = &*self;
            match schedule {
                Schedule::Sequential => {
                    for job in jobs.iter_mut() {
                        net.run_job(job, dt, injection);
                    }
                }
                Schedule::RowParallel => {
                    jobs.par_iter_mut()
                        .for_each(|job| net.run_job(job, dt, injection));
                }
            }
        }

        // 2) Commit
        for span in spans {
            let syn = self.synapse_range(span);
            self.v[span.clone()].copy_from_slice(&next_v[span.clone()]);
            self.filtered[syn.clone()].copy_from_slice(&next_f[syn]);
        }
        self.next_v = next_v;
        self.next_f = next_f;
    }

    fn split_jobs<'a>(
        &self,
        spans: &[Range<usize>],
        next_v: &'a mut [f32],
        next_f: &'a mut [f32],
    ) -> Vec<RowJob<'a>> {
        let mut jobs = Vec::with_capacity(spans.len());
        let mut rest_v = next_v;
        let mut rest_f = next_f;
        let mut v_base = 0;
        let mut f_base = 0;

        for span in spans {
            debug_assert!(span.start >= v_base, "spans must be sorted and disjoint");
            let syn = self.synapse_range(span);

            let (_, tail) = std::mem::take(&mut rest_v).split_at_mut(span.start - v_base);
            let (row_v, tail) = tail.split_at_mut(span.len());
            rest_v = tail;
            v_base = span.end;

            let (_, tail) = std::mem::take(&mut rest_f).split_at_mut(syn.start - f_base);
            let (row_f, tail) = tail.split_at_mut(syn.len());
            rest_f = tail;
            f_base = syn.end;

            jobs.push(RowJob {
                nodes: span.clone(),
                next_v: row_v,
                next_f: row_f,
            });
        }
        jobs
    }

    fn run_job(&self, job: &mut RowJob<'_>, dt: f32, injection: Option<&[f32]>) {
        let base = self.in_offset[job.nodes.start] as usize;
        for (local, i) in job.nodes.clone().enumerate() {
            let start = self.in_offset[i] as usize - base;
            let end = self.in_offset[i + 1] as usize - base;
            let injected = injection
                .and_then(|inj| inj.get(i).copied())
                .unwrap_or(0.0);
            job.next_v[local] = self.integrate(i, dt, injected, &mut job.next_f[start..end]);
        }
    }
}
