//! The per-instruction timing report: one row per instruction in program
//! order (spec §6).

use std::io::{self, Write};

use crate::instruction::Instruction;

/// One row of the timing report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingRow {
    /// Program-order tag.
    pub inst_tag: u64,
    /// Cycle fetched.
    pub fetch: Option<u64>,
    /// Cycle dispatched.
    pub disp: Option<u64>,
    /// Cycle fired (selected for issue).
    pub sched: Option<u64>,
    /// Cycle a result bus was granted.
    pub exec: Option<u64>,
    /// Cycle retired.
    pub update: Option<u64>,
}

impl From<&Instruction> for TimingRow {
    fn from(inst: &Instruction) -> Self {
        Self {
            inst_tag: inst.inst_tag.0,
            fetch: inst.fetch,
            disp: inst.disp,
            sched: inst.sched,
            exec: inst.exec,
            update: inst.update,
        }
    }
}

/// Builds the full timing report from the engine's instruction sequence,
/// in program order.
pub fn build_report(instructions: &[Instruction]) -> Vec<TimingRow> {
    instructions.iter().map(TimingRow::from).collect()
}

fn fmt_cell(value: Option<u64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

/// Writes the report as a TSV table with a header row.
pub fn write_tsv<W: Write>(rows: &[TimingRow], mut out: W) -> io::Result<()> {
    writeln!(out, "INST\tFETCH\tDISP\tSCHED\tEXEC\tUPDATE")?;
    for row in rows {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            row.inst_tag,
            fmt_cell(row.fetch),
            fmt_cell(row.disp),
            fmt_cell(row.sched),
            fmt_cell(row.exec),
            fmt_cell(row.update),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tag::InstTag;

    #[test]
    fn build_report_preserves_program_order() {
        let mut a = Instruction::new_fetched(InstTag(1), 0, Some(1), [None, None]);
        a.fetch = Some(1);
        let mut b = Instruction::new_fetched(InstTag(2), 0, Some(2), [None, None]);
        b.fetch = Some(1);
        let rows = build_report(&[a, b]);
        assert_eq!(rows[0].inst_tag, 1);
        assert_eq!(rows[1].inst_tag, 2);
    }

    #[test]
    fn write_tsv_renders_missing_cycles_as_dash() {
        let rows = [TimingRow {
            inst_tag: 1,
            fetch: Some(1),
            disp: Some(2),
            sched: None,
            exec: None,
            update: None,
        }];
        let mut buf = Vec::new();
        write_tsv(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("1\t1\t2\t-\t-\t-"));
    }
}
