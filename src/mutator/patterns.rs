// src/mutator/patterns.rs
// Graph pattern rules: arrow direction, labels, relationship types, ranges

use super::{lift, Edits, Mutator};
use crate::config::Category;
use crate::cypher::ast::*;

impl<'a> Mutator<'a> {
    pub(crate) fn pattern(&self, pattern: &Pattern) -> Edits<Pattern> {
        let mut out = Vec::new();
        lift(&mut out, self.each(&pattern.paths, Self::path), |paths| {
            Pattern { paths }
        });
        out
    }

    fn path(&self, path: &Path) -> Edits<Path> {
        let mut out = Vec::new();
        match path {
            Path::Simple(inner) => lift(&mut out, self.pattern_path(inner), Path::Simple),
            Path::Named { identifier, path } => lift(&mut out, self.path(path), |inner| {
                Path::Named {
                    identifier: identifier.clone(),
                    path: Box::new(inner),
                }
            }),
            Path::Shortest { single, path } => lift(&mut out, self.pattern_path(path), |inner| {
                Path::Shortest {
                    single: *single,
                    path: inner,
                }
            }),
        }
        out
    }

    pub(crate) fn pattern_path(&self, path: &PatternPath) -> Edits<PatternPath> {
        let mut out = Vec::new();
        let elements = self.each(&path.elements, |mutator, element| {
            let mut out = Vec::new();
            match element {
                PatternElement::Node(node) => {
                    lift(&mut out, mutator.node_pattern(node), PatternElement::Node)
                }
                PatternElement::Rel(rel) => {
                    lift(&mut out, mutator.rel_pattern(rel), PatternElement::Rel)
                }
            }
            out
        });
        lift(&mut out, elements, |elements| PatternPath { elements });
        out
    }

    fn node_pattern(&self, node: &NodePattern) -> Edits<NodePattern> {
        let mut out = Vec::new();

        lift(&mut out, self.optional(node.properties.as_ref()), |properties| {
            NodePattern {
                properties: Some(properties),
                ..node.clone()
            }
        });

        for i in 0..node.labels.len() {
            self.emit(&mut out, Category::LabelOnNodes, || {
                let mut node = node.clone();
                node.labels.remove(i);
                node
            });
        }

        out
    }

    fn rel_pattern(&self, rel: &RelPattern) -> Edits<RelPattern> {
        let mut out = Vec::new();

        lift(&mut out, self.optional(rel.properties.as_ref()), |properties| {
            RelPattern {
                properties: Some(properties),
                ..rel.clone()
            }
        });

        if let Some(range) = rel.var_length {
            for var_length in range_variants(range) {
                self.emit(&mut out, Category::VariableLengthRelationship, || {
                    RelPattern {
                        var_length: Some(var_length),
                        ..rel.clone()
                    }
                });
            }
        }

        for direction in Direction::ALL {
            if direction != rel.direction {
                self.emit(&mut out, Category::ArrowDirection, || RelPattern {
                    direction,
                    ..rel.clone()
                });
            }
        }

        for i in 0..rel.reltypes.len() {
            self.emit(&mut out, Category::LabelOnRelationships, || {
                let mut rel = rel.clone();
                rel.reltypes.remove(i);
                rel
            });
        }

        out
    }
}

/// Bound rewrites for `*s..e`; ranges missing either bound are left alone
fn range_variants(range: Range) -> Vec<Range> {
    let (Some(s), Some(e)) = (range.start, range.end) else {
        return Vec::new();
    };
    vec![
        Range { start: None, end: None },
        Range { start: Some(s), end: None },
        Range { start: None, end: Some(e) },
        Range { start: Some(s), end: Some(s) },
        Range { start: Some(e), end: Some(e) },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MutationConfig;
    use crate::cypher::{build, parse_statement};
    use crate::mutator::mutate;

    fn mutants_of(query: &str, category: Category) -> Vec<String> {
        let statement = parse_statement(query).unwrap();
        let set = mutate(&statement, &MutationConfig::only(category));
        set.get(category).iter().map(|m| build(m).unwrap()).collect()
    }

    #[test]
    fn test_arrow_direction() {
        let mut mutants = mutants_of("MATCH (a)-->(b) RETURN a", Category::ArrowDirection);
        mutants.sort();
        assert_eq!(
            mutants,
            vec!["MATCH (a)--(b) RETURN a", "MATCH (a)<--(b) RETURN a"]
        );
    }

    #[test]
    fn test_label_dropping() {
        assert_eq!(
            mutants_of("MATCH (a:A:B) RETURN a", Category::LabelOnNodes),
            vec!["MATCH (a:B) RETURN a", "MATCH (a:A) RETURN a"]
        );
        assert_eq!(
            mutants_of("MATCH (a)-[:X|Y]->(b) RETURN a", Category::LabelOnRelationships),
            vec!["MATCH (a)-[:Y]->(b) RETURN a", "MATCH (a)-[:X]->(b) RETURN a"]
        );
        assert!(mutants_of("MATCH (a) RETURN a", Category::LabelOnNodes).is_empty());
    }

    #[test]
    fn test_range_rewrites() {
        assert_eq!(
            mutants_of("MATCH (a)-[*1..3]->(b) RETURN a", Category::VariableLengthRelationship),
            vec![
                "MATCH (a)-[*]->(b) RETURN a",
                "MATCH (a)-[*1..]->(b) RETURN a",
                "MATCH (a)-[*..3]->(b) RETURN a",
                "MATCH (a)-[*1]->(b) RETURN a",
                "MATCH (a)-[*3]->(b) RETURN a",
            ]
        );
    }

    #[test]
    fn test_open_ranges_untouched() {
        for query in [
            "MATCH (a)-[*]->(b) RETURN a",
            "MATCH (a)-[*2..]->(b) RETURN a",
            "MATCH (a)-[*..2]->(b) RETURN a",
        ] {
            assert!(mutants_of(query, Category::VariableLengthRelationship).is_empty());
        }
    }

    #[test]
    fn test_edits_inside_named_and_shortest_paths() {
        assert_eq!(
            mutants_of("MATCH p = (a:A)-->(b) RETURN p", Category::LabelOnNodes),
            vec!["MATCH p = (a)-->(b) RETURN p"]
        );
        assert_eq!(
            mutants_of("MATCH p = shortestPath((a)-[*1..3]->(b)) RETURN p", Category::ArrowDirection).len(),
            2
        );
    }

    #[test]
    fn test_property_maps_are_mutated() {
        assert_eq!(
            mutants_of("MATCH (a {x: 1}) RETURN a", Category::UnaryOperator),
            vec![
                "MATCH (a {x: (-1)}) RETURN a",
                "MATCH (a {x: (1 + 1)}) RETURN a",
                "MATCH (a {x: (1 - 1)}) RETURN a",
            ]
        );
    }
}
