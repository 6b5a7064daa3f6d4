//! Bookshelf benchmark reader.
//!
//! Reads the UCSC bookshelf floorplan format: an `.aux` file naming the
//! `.blocks`, `.nets`, and `.pl` files of a design. Hard rectilinear blocks
//! become macros, `terminal` lines become fixed terminals, and multi-pin
//! nets are decomposed into weighted two-point star pairs anchored at the
//! first pin.

use crate::component::Component;
use crate::error::ModelError;
use crate::ids::ComponentId;
use crate::netlist::Netlist;
use std::path::Path;

/// Reads a complete benchmark via its `.aux` file.
pub fn read_benchmark(aux_path: &Path) -> Result<Netlist, ModelError> {
    let aux = read_file(aux_path)?;
    let dir = aux_path.parent().unwrap_or_else(|| Path::new("."));

    let mut blocks = None;
    let mut nets = None;
    let mut pl = None;
    for token in aux.split_whitespace() {
        if token.ends_with(".blocks") {
            blocks = Some(dir.join(token));
        } else if token.ends_with(".nets") {
            nets = Some(dir.join(token));
        } else if token.ends_with(".pl") {
            pl = Some(dir.join(token));
        }
    }

    let blocks =
        blocks.ok_or_else(|| ModelError::Format("aux file names no .blocks file".to_string()))?;
    let nets =
        nets.ok_or_else(|| ModelError::Format("aux file names no .nets file".to_string()))?;

    let mut netlist = Netlist::new();
    parse_blocks(&read_file(&blocks)?, &mut netlist)?;
    parse_nets(&read_file(&nets)?, &mut netlist)?;
    if let Some(pl) = pl {
        // The .pl file is optional; without it components have no seed positions.
        parse_pl(&read_file(&pl)?, &mut netlist)?;
    }
    Ok(netlist)
}

fn read_file(path: &Path) -> Result<String, ModelError> {
    std::fs::read_to_string(path).map_err(|e| ModelError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn check_header(content: &str, kind: &str) -> Result<(), ModelError> {
    let first = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    if !(first.starts_with("UCSC") && first.contains(kind)) {
        return Err(ModelError::Format(format!(
            "missing 'UCSC {kind}' header, found '{first}'"
        )));
    }
    Ok(())
}

fn parse_count(line: &str) -> Result<usize, ModelError> {
    line.split(':')
        .nth(1)
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| ModelError::Format(format!("malformed count line '{line}'")))
}

/// Parses a `.blocks` file into macro and terminal components.
pub fn parse_blocks(content: &str, netlist: &mut Netlist) -> Result<(), ModelError> {
    check_header(content, "blocks")?;

    let mut expected_blocks = None;
    let mut expected_terminals = None;
    let mut found_blocks = 0usize;
    let mut found_terminals = 0usize;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens[0] {
            "UCSC" => continue,
            "NumSoftRectangularBlocks" => continue,
            "NumHardRectilinearBlocks" => expected_blocks = Some(parse_count(line)?),
            "NumTerminals" => expected_terminals = Some(parse_count(line)?),
            name if tokens.len() >= 2 && tokens[1] == "hardrectilinear" => {
                let (width, height) = parse_block_outline(line)?;
                netlist.add_component(Component::macro_block(name, width, height));
                found_blocks += 1;
            }
            name if tokens.len() >= 2 && tokens[1] == "terminal" => {
                netlist.add_component(Component::terminal(name, 0, 0));
                found_terminals += 1;
            }
            _ => {
                return Err(ModelError::Format(format!(
                    "unrecognized blocks line '{line}'"
                )))
            }
        }
    }

    if let Some(expected) = expected_blocks {
        if expected != found_blocks {
            return Err(ModelError::CountMismatch {
                what: "blocks",
                expected,
                found: found_blocks,
            });
        }
    }
    if let Some(expected) = expected_terminals {
        if expected != found_terminals {
            return Err(ModelError::CountMismatch {
                what: "terminals",
                expected,
                found: found_terminals,
            });
        }
    }
    Ok(())
}

/// Extracts the block size from a `hardrectilinear` outline.
///
/// The outline is the corner list `(0, 0) (0, H) (W, H) (W, 0)`; the third
/// vertex carries both dimensions.
fn parse_block_outline(line: &str) -> Result<(u32, u32), ModelError> {
    let vertices: Vec<&str> = line.split('(').skip(1).collect();
    if vertices.len() != 4 {
        return Err(ModelError::Format(format!(
            "expected 4 outline vertices in '{line}'"
        )));
    }
    let third = vertices[2]
        .split(')')
        .next()
        .unwrap_or_default();
    let mut coords = third.split(',').map(|v| v.trim().parse::<u32>());
    match (coords.next(), coords.next()) {
        (Some(Ok(width)), Some(Ok(height))) => Ok((width, height)),
        _ => Err(ModelError::Format(format!(
            "malformed outline vertex in '{line}'"
        ))),
    }
}

/// Parses a `.nets` file, decomposing each net into star pairs.
pub fn parse_nets(content: &str, netlist: &mut Netlist) -> Result<(), ModelError> {
    check_header(content, "nets")?;

    let mut declared_nets = None;
    let mut found_nets = 0usize;
    let mut anchor: Option<ComponentId> = None;
    let mut remaining_degree = 0usize;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens[0] {
            "UCSC" => continue,
            "NumNets" => declared_nets = Some(parse_count(line)?),
            "NumPins" => continue,
            "NetDegree" => {
                if remaining_degree > 0 {
                    return Err(ModelError::Format(
                        "NetDegree declared before previous net completed".to_string(),
                    ));
                }
                remaining_degree = parse_count(line)?;
                anchor = None;
                found_nets += 1;
            }
            name => {
                if remaining_degree == 0 {
                    return Err(ModelError::Format(format!(
                        "pin '{name}' outside any NetDegree group"
                    )));
                }
                let id = netlist
                    .component_by_name(name)
                    .ok_or_else(|| ModelError::UnknownComponent(name.to_string()))?;
                match anchor {
                    None => anchor = Some(id),
                    Some(first) => {
                        netlist.connect(first, id, 1);
                    }
                }
                remaining_degree -= 1;
            }
        }
    }

    if remaining_degree > 0 {
        return Err(ModelError::Format(
            "nets file ended inside a NetDegree group".to_string(),
        ));
    }
    if let Some(expected) = declared_nets {
        if expected != found_nets {
            return Err(ModelError::CountMismatch {
                what: "nets",
                expected,
                found: found_nets,
            });
        }
    }
    Ok(())
}

/// Parses a `.pl` file, assigning seed positions to named components.
pub fn parse_pl(content: &str, netlist: &mut Netlist) -> Result<(), ModelError> {
    check_header(content, "pl")?;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens[0] == "UCSC" {
            continue;
        }
        if tokens.len() < 3 {
            return Err(ModelError::Format(format!("malformed pl line '{line}'")));
        }
        let id = netlist
            .component_by_name(tokens[0])
            .ok_or_else(|| ModelError::UnknownComponent(tokens[0].to_string()))?;
        let x: i64 = tokens[1]
            .parse()
            .map_err(|_| ModelError::Format(format!("bad x coordinate in '{line}'")))?;
        let y: i64 = tokens[2]
            .parse()
            .map_err(|_| ModelError::Format(format!("bad y coordinate in '{line}'")))?;
        netlist.component_mut(id).position = Some((x, y));
    }
    Ok(())
}
