//! Text exports of a solved search: step tables and the Graphviz trace.

use std::fmt::{Display, Write};

use crate::config::Points;
use crate::maze::{AgentState, Maze};
use crate::search::TraceNode;
use crate::tiles::{replay, Tiles};
use crate::Direction;

fn table_line(columns: &[(&str, usize)]) -> String {
    let mut line = String::new();
    for (ix, (text, width)) in columns.iter().enumerate() {
        if ix > 0 {
            line.push(' ');
        }
        let _ = write!(line, "{:<width$}", text, width = width);
    }
    line.trim_end().to_string()
}

fn action_name(action: Option<Direction>) -> String {
    action.map(|a| format!("{:?}", a)).unwrap_or_default()
}

/// One row per grid from `start` on, with a `Yes` in the last column where a
/// sticky pair swapped. `None` if an action cannot be replayed.
pub fn tile_step_table(start: Tiles, actions: &[Direction], sticky: bool) -> Option<String> {
    let steps = replay(start, actions, sticky)?;

    let mut lines = vec![
        table_line(&[("Step", 5), ("State", 12), ("Action", 8), ("Swap", 0)]),
        "-".repeat(35),
        table_line(&[("0", 5), (start.flat().as_str(), 12)]),
    ];
    for (ix, ((tiles, swapped), &action)) in steps.iter().zip(actions).enumerate() {
        lines.push(table_line(&[
            ((ix + 1).to_string().as_str(), 5),
            (tiles.flat().as_str(), 12),
            (action_name(Some(action)).as_str(), 8),
            (if *swapped { "Yes" } else { "" }, 0),
        ]));
    }
    Some(lines.join("\n"))
}

/// Step, agent cell, action, power turns left and the running score.
pub fn maze_step_table(
    maze: &Maze,
    start: &AgentState,
    actions: &[Direction],
    points: Points,
) -> Option<String> {
    let states = maze.replay(start, actions)?;

    let mut lines = vec![
        table_line(&[
            ("Step", 5),
            ("Position", 10),
            ("Action", 8),
            ("Ghost", 6),
            ("Score", 0),
        ]),
        "-".repeat(40),
    ];
    let mut score = 0;
    for (ix, state) in states.iter().enumerate() {
        let action = ix.checked_sub(1).map(|prev| actions[prev]);
        if let Some(prev) = ix.checked_sub(1).map(|prev| &states[prev]) {
            score += (prev.pearls.len() - state.pearls.len()) as u32 * points.pearl;
            score += (prev.gems.len() - state.gems.len()) as u32 * points.gem;
        }
        lines.push(table_line(&[
            (ix.to_string().as_str(), 5),
            (state.agent.to_string().as_str(), 10),
            (action_name(action).as_str(), 8),
            (state.ghost_turns.to_string().as_str(), 6),
            (score.to_string().as_str(), 0),
        ]));
    }
    Some(lines.join("\n"))
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Graphviz digraph of the traced nodes, edges labelled with the move that
/// produced the child.
pub fn to_dot<S, M: Display>(trace: &[TraceNode<S, M>], label: impl Fn(&S) -> String) -> String {
    let mut out = String::from("digraph search {\n  node [shape=box, fontname=monospace];\n");
    for node in trace {
        let _ = writeln!(out, "  n{} [label=\"{}\"];", node.id, escape(&label(&node.state)));
    }
    for node in trace {
        if let (Some(parent), Some(action)) = (node.parent, &node.action) {
            let _ = writeln!(out, "  n{} -> n{} [label=\"{}\"];", parent, node.id, action);
        }
    }
    out.push_str("}\n");
    out
}
