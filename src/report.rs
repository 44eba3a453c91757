use std::{
    collections::HashMap,
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
    io::{self, Write},
};

use prettytable::{format, Table};
use serde::Serialize;

use crate::inventory::{Image, Instance};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Table,
    Json,
}

#[derive(Debug)]
pub enum ReportError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl Error for ReportError {}
impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Io(e) => write!(f, "ReportError: {}", e),
            Self::Json(e) => write!(f, "ReportError: {}", e),
        }
    }
}

impl From<io::Error> for ReportError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[derive(Serialize, Debug)]
pub struct Report<'a> {
    pub region: String,
    pub cutoff: String,
    #[serde(skip)]
    pub instances: &'a [Instance],
    pub unused_images: Vec<&'a Image>,
}

impl Report<'_> {
    pub fn write(
        &self,
        out: &mut impl Write,
        output: OutputFormat,
        show_instances: bool,
    ) -> Result<(), ReportError> {
        match output {
            OutputFormat::Text => {
                if show_instances {
                    self.write_reservations(out)?;
                }
                self.write_text(out)?;
            }
            OutputFormat::Table => self.write_table(out)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, self)?;
                writeln!(out)?;
            }
        }

        Ok(())
    }

    fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Unused AMIs:")?;
        for image in &self.unused_images {
            writeln!(out, "{}", image.image_id)?;
        }

        Ok(())
    }

    fn write_reservations(&self, out: &mut impl Write) -> io::Result<()> {
        for (reservation_id, instance_ids) in reservations(self.instances) {
            writeln!(out, "Reservation ID: {}", reservation_id)?;
            writeln!(out, "Instance IDs:")?;
            for instance_id in instance_ids {
                writeln!(out, "   {}", instance_id)?;
            }
            writeln!(out)?;
        }

        Ok(())
    }

    fn write_table(&self, out: &mut impl Write) -> io::Result<()> {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row!["Image ID", "Name", "Created"]);

        for image in &self.unused_images {
            table.add_row(row![
                image.image_id,
                image.name,
                image.creation_date.as_deref().unwrap_or("-")
            ]);
        }

        table.print(out)?;
        Ok(())
    }
}

// groups instance ids by reservation, keeping the order reservations were first seen
fn reservations(instances: &[Instance]) -> Vec<(&str, Vec<&str>)> {
    let mut grouped: Vec<(&str, Vec<&str>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for instance in instances {
        let reservation_id = instance.reservation_id.as_deref().unwrap_or("-");

        let slot = *index.entry(reservation_id).or_insert_with(|| {
            grouped.push((reservation_id, Vec::new()));
            grouped.len() - 1
        });
        grouped[slot].1.push(&instance.instance_id);
    }

    grouped
}
