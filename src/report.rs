//! Renderer-agnostic view of a simulation run.
//!
//! A report carries per-task execution segments for stacked-bar rendering,
//! the period boundary markers to draw over them, and the deadline misses.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::constants::{Feasibility, Policy};
use crate::scheduler::{DeadlineMiss, ResponseTime, Simulation};
use crate::{TaskSet, TimeStep};

/// One execution stretch of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub task_id: String,
    pub start: TimeStep,
    pub duration: TimeStep,
}

/// Vertical boundary marker at a multiple of one or more task periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Marker {
    /// Comma-separated task ids sharing the boundary, in task-set order.
    pub label: String,
    pub time: TimeStep,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub policy: Policy,
    pub feasibility: Feasibility,
    pub hyperperiod: TimeStep,
    pub segments: Vec<Segment>,
    pub markers: Vec<Marker>,
    pub misses: Vec<DeadlineMiss>,
    pub preemptions: usize,
    pub response_times: Option<Vec<ResponseTime>>,
}

impl Report {
    /// Execution segments of one task, ordered by start time.
    pub fn segments_for<'a>(&'a self, task_id: &'a str) -> impl Iterator<Item = &'a Segment> + 'a {
        self.segments.iter().filter(move |s| s.task_id == task_id)
    }

    pub fn is_schedulable(&self) -> bool {
        self.misses.is_empty()
    }
}

/// Builds the report of a finished simulation. Pure; idle time yields no segment.
pub fn build_report(
    task_set: &TaskSet,
    simulation: &Simulation,
    feasibility: Feasibility,
    response_times: Option<Vec<ResponseTime>>,
) -> Report {
    Report {
        policy: simulation.policy,
        feasibility,
        hyperperiod: simulation.hyperperiod,
        segments: segments(task_set, simulation),
        markers: markers(task_set, simulation.hyperperiod),
        misses: simulation.misses.clone(),
        preemptions: simulation.preemptions,
        response_times,
    }
}

/// Segments grouped per task in task-set order, each group sorted by start.
pub fn segments(task_set: &TaskSet, simulation: &Simulation) -> Vec<Segment> {
    task_set
        .iter()
        .flat_map(|task| {
            simulation
                .intervals
                .iter()
                .filter(move |i| i.task_id.as_deref() == Some(task.id()))
                .map(|i| Segment {
                    task_id: i.task_id.clone().unwrap_or_default(),
                    start: i.start,
                    duration: i.duration(),
                })
        })
        .collect()
}

/// Markers at every multiple of each period up to and including the
/// hyperperiod. Coincident boundaries are merged into a single marker.
pub fn markers(task_set: &TaskSet, hyperperiod: TimeStep) -> Vec<Marker> {
    let mut boundaries: BTreeMap<TimeStep, Vec<&str>> = BTreeMap::new();

    for task in task_set.iter() {
        let mut time = Some(task.period());
        while let Some(t) = time.filter(|&t| t <= hyperperiod) {
            boundaries.entry(t).or_default().push(task.id());
            time = t.checked_add(task.period());
        }
    }

    boundaries
        .into_iter()
        .map(|(time, ids)| Marker {
            label: ids.join(","),
            time,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::scheduler::{check, Core};
    use crate::Task;

    fn set(tasks: &[(&str, TimeStep, TimeStep, TimeStep)]) -> TaskSet {
        TaskSet::new(
            tasks
                .iter()
                .map(|&(id, c, d, p)| Task::new(id, c, d, p).unwrap())
                .collect(),
        )
        .unwrap()
    }

    fn marker(label: &str, time: TimeStep) -> Marker {
        Marker {
            label: label.to_string(),
            time,
        }
    }

    #[test]
    fn test_coincident_markers_are_merged() {
        let task_set = set(&[("A", 1, 10, 10), ("B", 1, 20, 20)]);
        assert_eq!(
            markers(&task_set, 20),
            vec![marker("A", 10), marker("A,B", 20)]
        );
    }

    #[test]
    fn test_marker_labels_follow_task_order() {
        let task_set = set(&[("Z", 1, 6, 6), ("B", 1, 4, 4), ("M", 1, 3, 3)]);
        assert_eq!(
            markers(&task_set, 12),
            vec![
                marker("M", 3),
                marker("B", 4),
                marker("Z,M", 6),
                marker("B", 8),
                marker("M", 9),
                marker("Z,B,M", 12),
            ]
        );
    }

    #[test]
    fn test_markers_near_time_limit() {
        let half = set(&[("A", 1, 1 << 63, 1 << 63)]);
        assert_eq!(markers(&half, u64::MAX), vec![marker("A", 1 << 63)]);

        let full = set(&[("A", 1, u64::MAX, u64::MAX), ("B", 1, 10, u64::MAX)]);
        assert_eq!(markers(&full, u64::MAX), vec![marker("A,B", u64::MAX)]);
    }

    #[test]
    fn test_segments_grouped_per_task() {
        let task_set = set(&[("B", 4, 10, 10), ("A", 2, 5, 5)]);
        let simulation = Core::new(&task_set, Policy::Rm, SimulationConfig::default())
            .simulate()
            .unwrap();
        let report = build_report(&task_set, &simulation, check(&task_set, Policy::Rm), None);

        let starts: Vec<(&str, TimeStep, TimeStep)> = report
            .segments
            .iter()
            .map(|s| (s.task_id.as_str(), s.start, s.duration))
            .collect();
        assert_eq!(
            starts,
            vec![("B", 2, 3), ("B", 7, 1), ("A", 0, 2), ("A", 5, 2)]
        );
        assert_eq!(report.segments_for("A").count(), 2);
        assert_eq!(report.segments_for("C").count(), 0);
        assert!(report.is_schedulable());
        assert_eq!(report.preemptions, 1);
    }

    #[test]
    fn test_report_serializes_to_contract() {
        let task_set = set(&[("A", 15, 20, 20), ("B", 10, 20, 20)]);
        let simulation = Core::new(&task_set, Policy::Rm, SimulationConfig::default())
            .simulate()
            .unwrap();
        let report = build_report(&task_set, &simulation, check(&task_set, Policy::Rm), None);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["policy"], "RM");
        assert_eq!(json["feasibility"], "PossiblyInfeasible");
        assert_eq!(json["hyperperiod"], 20);
        assert_eq!(json["segments"][1]["task_id"], "B");
        assert_eq!(json["segments"][1]["duration"], 5);
        assert_eq!(json["markers"][0]["label"], "A,B");
        assert_eq!(json["misses"][0]["task_id"], "B");
        assert!(json["misses"][0]["completion_time"].is_null());
        assert!(!report.is_schedulable());
    }
}
