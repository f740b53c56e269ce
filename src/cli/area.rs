//! Area commands: create, list

use serde::Serialize;

use crate::bridge::Transport;
use crate::client::Client;
use crate::error::Result;
use crate::model::{Area, NewArea};
use crate::output::{emit_success, format_area_table, Human, HumanOutput, OutputOptions};

#[derive(Serialize)]
struct AreaListReport {
    count: usize,
    areas: Vec<Area>,
}

pub fn run_create<T: Transport>(
    client: &Client<T>,
    name: String,
    output: OutputOptions,
) -> Result<()> {
    let created = client.create_area(&NewArea { name })?;

    let mut human = HumanOutput::new(format!("Created area \"{}\"", created.name));
    human.push_summary("id", created.id.clone());
    emit_success(output, "area create", &created, Some(Human::Block(&human)))
}

pub fn run_list<T: Transport>(client: &Client<T>, output: OutputOptions) -> Result<()> {
    let areas = client.list_areas()?;
    let table = format_area_table(&areas);
    let report = AreaListReport {
        count: areas.len(),
        areas,
    };
    emit_success(output, "area list", &report, Some(Human::Table(table)))
}
