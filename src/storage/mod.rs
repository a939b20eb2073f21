//! Results persistence module

use anyhow::Result;
use crate::analysis::AnalysisReport;
use crate::centrality::RankedNode;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use serde_json::{json, to_string_pretty};

/// Save analysis results to the specified directory
pub fn save_results(report: &AnalysisReport, output_dir: &Path) -> Result<()> {
    log::info!(
        "Saving {} communities to {}",
        report.partition.len(),
        output_dir.display()
    );

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    save_summary(report, output_dir)?;
    save_communities(report, output_dir)?;
    save_influencers(report, output_dir)?;
    save_nodes(report, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

fn ranking_json(ranking: &[RankedNode]) -> serde_json::Value {
    json!(ranking
        .iter()
        .map(|r| json!({ "node": r.node, "degree_centrality": r.score }))
        .collect::<Vec<_>>())
}

/// Save summary information
fn save_summary(report: &AnalysisReport, output_dir: &Path) -> Result<()> {
    let communities = &report.partition.communities;
    let count = communities.len().max(1) as f64;

    let summary = json!({
        "graph_stats": {
            "node_count": report.graph.node_count(),
            "edge_count": report.graph.edge_count(),
        },
        "detection": {
            "seed": report.seed,
            "converged": report.partition.converged,
            "iterations": report.partition.iterations,
        },
        "community_stats": {
            "community_count": communities.len(),
            "largest_community_size": communities.first().map_or(0, |c| c.size),
            "smallest_community_size": communities.last().map_or(0, |c| c.size),
            "avg_community_size": communities.iter().map(|c| c.size).sum::<usize>() as f64 / count,
            "avg_density": communities.iter().map(|c| c.density).sum::<f64>() / count,
        },
        "top_influencers": ranking_json(&report.global_ranking),
    });

    let mut file = File::create(output_dir.join("summary.json"))?;
    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save every community with its members and influencers
fn save_communities(report: &AnalysisReport, output_dir: &Path) -> Result<()> {
    let communities_json = json!({
        "communities": report.partition.communities.iter().map(|c| {
            let influencers = report
                .community_rankings
                .get(&c.id)
                .map(|ranking| ranking_json(ranking))
                .unwrap_or_else(|| json!([]));
            json!({
                "id": c.id,
                "size": c.size,
                "density": c.density,
                "top_influencers": influencers,
                "members": c.members,
            })
        }).collect::<Vec<_>>()
    });

    let mut file = File::create(output_dir.join("communities.json"))?;
    file.write_all(to_string_pretty(&communities_json)?.as_bytes())?;

    Ok(())
}

/// Save global and per-community rankings as one table
fn save_influencers(report: &AnalysisReport, output_dir: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(output_dir.join("influencers.csv"))?);

    writeln!(file, "scope,community,rank,node,degree_centrality")?;

    for (rank, entry) in report.global_ranking.iter().enumerate() {
        writeln!(file, "global,,{},{},{:.6}", rank + 1, csv_field(&entry.node), entry.score)?;
    }

    for (community, ranking) in &report.community_rankings {
        for (rank, entry) in ranking.iter().enumerate() {
            writeln!(
                file,
                "community,{},{},{},{:.6}",
                community,
                rank + 1,
                csv_field(&entry.node),
                entry.score
            )?;
        }
    }

    file.flush()?;
    Ok(())
}

/// Save the community assignment and degree of every node
fn save_nodes(report: &AnalysisReport, output_dir: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(output_dir.join("nodes.csv"))?);

    writeln!(file, "node,community,degree")?;

    for community in &report.partition.communities {
        for member in &community.members {
            writeln!(
                file,
                "{},{},{}",
                csv_field(member),
                community.id,
                report.graph.degree(member)?
            )?;
        }
    }

    file.flush()?;
    Ok(())
}

/// Quote a value that would otherwise break a CSV row
fn csv_field(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_seeded;
    use crate::config::Config;
    use crate::graph::FollowRecord;

    #[test]
    fn test_save_results_writes_all_files() {
        let records = vec![
            FollowRecord::new("A", "B"),
            FollowRecord::new("B", "C"),
            FollowRecord::new("A", "C"),
            FollowRecord::new("D", "E"),
        ];
        let report = analyze_seeded(&records, &Config::default(), 5).unwrap();
        let dir = tempfile::tempdir().unwrap();

        save_results(&report, dir.path()).unwrap();

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("summary.json")).unwrap())
                .unwrap();
        assert_eq!(summary["graph_stats"]["node_count"], 5);
        assert_eq!(summary["community_stats"]["community_count"], 2);
        assert_eq!(summary["detection"]["seed"], 5);

        let communities: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("communities.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(communities["communities"][0]["members"], json!(["A", "B", "C"]));

        let influencers = fs::read_to_string(dir.path().join("influencers.csv")).unwrap();
        assert!(influencers.starts_with("scope,community,rank,node,degree_centrality\n"));
        assert_eq!(influencers.lines().filter(|l| l.starts_with("global,")).count(), 5);
        assert!(influencers.contains("community,1,1,D,1.000000"));

        let nodes = fs::read_to_string(dir.path().join("nodes.csv")).unwrap();
        assert_eq!(nodes.lines().count(), 6);
        assert!(nodes.contains("E,1,1"));
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("line\nbreak"), "\"line\nbreak\"");
        assert_eq!(csv_field("a\rb"), "\"a\rb\"");
        assert_eq!(csv_field("crlf\r\n"), "\"crlf\r\n\"");
    }
}
