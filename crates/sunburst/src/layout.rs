use crate::config::WheelConfig;
use crate::dataset::{Color, Dataset};
use crate::geometry::{PathData, Point, sector_arc_path, spoke_path};
use crate::hierarchy::{HierarchyNode, Label, count_leaves};
use crate::ring::{Ring, RingId, Span};
use crate::surface::{DrawingSurface, ElementKind};
use derive_more::Display;

const FULL_TURN: f64 = 360.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("s{_0}")]
pub struct SectorId(u32);

/// One emitted slice of a ring.
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    pub id: SectorId,
    pub ring: RingId,
    pub label: Label,
    pub span: Span,
    pub spoke: PathData,
    pub midline: PathData,
}

/// Colored wedge under a top-level category.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendArc {
    pub category: Label,
    pub span: Span,
    pub color: Color,
    pub path: PathData,
}

/// Summary of one layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wheel {
    pub total_leaves: usize,
    pub sectors: Vec<Sector>,
    pub legend: Vec<LegendArc>,
}

impl Wheel {
    pub fn ring_sectors(&self, ring: RingId) -> impl Iterator<Item = &Sector> {
        self.sectors.iter().filter(move |s| s.ring == ring)
    }
}

struct LayoutPass<'a, S: DrawingSurface> {
    dataset: &'a Dataset,
    config: &'a WheelConfig,
    surface: &'a mut S,
    center: Point,
    rings: [(Ring, S::Node); 3],
    color_group: S::Node,
    total_leaves: usize,
    next_id: u32,
    wheel: Wheel,
}

impl<'a, S: DrawingSurface> LayoutPass<'a, S> {
    fn new(dataset: &'a Dataset, config: &'a WheelConfig, surface: &'a mut S) -> Self {
        let r0 = config.outer_radius;
        let center = Point::new(r0, r0);
        let root = surface.root();

        let color_group = surface.create(&root, ElementKind::G, &[]);
        surface.set_attribute(&color_group, "id", "color");

        let rings = [
            Ring::new(RingId::Inner, 0.0, config.inner_radius, config.inner_label_offset),
            Ring::new(RingId::Middle, config.inner_radius, config.middle_radius, 0.0),
            Ring::new(RingId::Outer, config.middle_radius, r0, 0.0),
        ]
        .map(|ring| {
            let node = Self::ring_group(surface, &root, &ring, center);
            (ring, node)
        });

        let total_leaves = count_leaves(&dataset.labels);

        Self {
            dataset,
            config,
            surface,
            center,
            rings,
            color_group,
            total_leaves,
            next_id: 1,
            wheel: Wheel {
                total_leaves,
                ..Wheel::default()
            },
        }
    }

    fn ring_group(surface: &mut S, root: &S::Node, ring: &Ring, center: Point) -> S::Node {
        let group = surface.create(root, ElementKind::G, &[]);
        surface.set_attribute(&group, "id", ring.id.into());

        let outline = surface.create(&group, ElementKind::Circle, &["outline"]);
        surface.set_attribute(&outline, "cx", &center.x.to_string());
        surface.set_attribute(&outline, "cy", &center.y.to_string());
        surface.set_attribute(&outline, "r", &ring.outer_radius.to_string());
        group
    }

    /// Angular width of `leaves` items against the whole tree.
    fn width(&self, leaves: usize) -> f64 {
        if self.total_leaves == 0 {
            return 0.0;
        }
        leaves as f64 * FULL_TURN / self.total_leaves as f64
    }

    fn run(mut self) -> Wheel {
        let dataset = self.dataset;
        self.visit(&dataset.labels, 0);
        self.wheel
    }

    fn visit(&mut self, node: &HierarchyNode, depth: usize) {
        match node {
            HierarchyNode::Interior(children) => {
                for (label, child) in children {
                    let width = self.width(count_leaves(child));
                    let span = self.emit(depth, width, label);
                    self.visit(child, depth + 1);

                    if depth == 0
                        && let Some(span) = span
                    {
                        self.legend(label, span);
                    }
                }
            }
            HierarchyNode::LeafGroup(items) => {
                let width = self.width(1);
                for item in items {
                    self.emit(depth, width, item);
                }
            }
        }
    }

    /// Advances ring `depth` by `width` and draws the resulting sector.
    fn emit(&mut self, depth: usize, width: f64, label: &Label) -> Option<Span> {
        let Some((ring, ring_node)) = self.rings.get_mut(depth) else {
            log::debug!("No ring for '{}' at depth {}, skipped", label, depth);
            return None;
        };
        let span = ring.advance(width);
        let ring = ring.clone();
        let ring_node = ring_node.clone();

        let id = SectorId(self.next_id);
        self.next_id += 1;

        let sector = Sector {
            id,
            ring: ring.id,
            label: label.clone(),
            span,
            spoke: spoke_path(self.center, span.start, ring.inner_radius, ring.outer_radius),
            midline: spoke_path(self.center, span.mid(), ring.inner_radius, ring.outer_radius),
        };
        self.draw_sector(&ring, &ring_node, &sector);
        self.wheel.sectors.push(sector);
        Some(span)
    }

    fn draw_sector(&mut self, ring: &Ring, ring_node: &S::Node, sector: &Sector) {
        let surface = &mut *self.surface;
        let id = sector.id.to_string();

        let group = surface.create(ring_node, ElementKind::G, &["sector"]);
        surface.set_attribute(&group, "id", &id);

        let midline_id = format!("{id}-midline");
        let defs = surface.create(&group, ElementKind::Defs, &[]);
        let midline = surface.create(&defs, ElementKind::Path, &["midline"]);
        surface.set_attribute(&midline, "id", &midline_id);
        surface.set_attribute(&midline, "d", &sector.midline);

        let text = surface.create(&group, ElementKind::Text, &[]);
        let label = surface.create(&text, ElementKind::TextPath, &["label"]);
        if surface.resolve(&midline_id).is_some() {
            surface.set_attribute(&label, "href", &format!("#{midline_id}"));
        } else {
            log::warn!("Midline {} not resolvable, label left unbound", midline_id);
        }
        surface.set_attribute(&label, "startOffset", &ring.label_start_offset());
        surface.set_text(&label, &sector.label);

        let spoke = surface.create(&group, ElementKind::Path, &["spoke"]);
        surface.set_attribute(&spoke, "d", &sector.spoke);
    }

    fn legend(&mut self, category: &Label, span: Span) {
        let color = self
            .dataset
            .colors
            .resolve(category, &self.config.default_color)
            .clone();
        let path = sector_arc_path(self.center, span.start, span.end, self.config.inner_radius);

        let arc = self.surface.create(&self.color_group, ElementKind::Path, &[]);
        self.surface.set_attribute(&arc, "d", &path);
        self.surface.set_attribute(&arc, "fill", &color);

        self.wheel.legend.push(LegendArc {
            category: category.clone(),
            span,
            color,
            path,
        });
    }
}

/// Lays out `dataset` as three concentric rings and draws it onto `surface`.
///
/// Every sector's width is its leaf count over the whole tree's leaf count, times 360.
/// Widths accumulate per ring, so each ring closes at 360 up to rounding.
pub fn build_wheel<S: DrawingSurface>(
    dataset: &Dataset,
    config: &WheelConfig,
    surface: &mut S,
) -> Wheel {
    let wheel = LayoutPass::new(dataset, config, surface).run();
    log::debug!(
        "Built wheel: {} leaves, {} sectors, {} categories",
        wheel.total_leaves,
        wheel.sectors.len(),
        wheel.legend.len()
    );
    wheel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ColorMap;
    use crate::surface::SvgScene;

    const EPS: f64 = 1e-6;

    fn dataset() -> Dataset {
        Dataset::new(
            ColorMap::new([("A", "red")]),
            HierarchyNode::interior([
                (
                    "A",
                    HierarchyNode::interior([
                        ("A1", HierarchyNode::leaves(["a", "b"])),
                        ("A2", HierarchyNode::leaves(["c"])),
                    ]),
                ),
                ("B", HierarchyNode::interior([("B1", HierarchyNode::leaves(["d"]))])),
            ]),
        )
    }

    fn build(dataset: &Dataset) -> (Wheel, SvgScene) {
        let config = WheelConfig::default();
        let mut scene = SvgScene::new(config.outer_radius);
        let wheel = build_wheel(dataset, &config, &mut scene);
        (wheel, scene)
    }

    fn spans(wheel: &Wheel, ring: RingId) -> Vec<Span> {
        wheel.ring_sectors(ring).map(|s| s.span).collect()
    }

    #[test]
    fn test_inner_widths_are_proportional() {
        let (wheel, _) = build(&dataset());
        let inner = spans(&wheel, RingId::Inner);
        assert_eq!(inner.len(), 2);
        assert!((inner[0].width() - 270.0).abs() < EPS);
        assert!((inner[1].width() - 90.0).abs() < EPS);
    }

    #[test]
    fn test_middle_and_outer_widths() {
        let (wheel, _) = build(&dataset());
        let middle: Vec<f64> = spans(&wheel, RingId::Middle).iter().map(Span::width).collect();
        let outer: Vec<f64> = spans(&wheel, RingId::Outer).iter().map(Span::width).collect();

        assert_eq!(middle.len(), 3);
        assert!((middle[0] - 180.0).abs() < EPS);
        assert!((middle[1] - 90.0).abs() < EPS);
        assert!((middle[2] - 90.0).abs() < EPS);
        assert!(outer.iter().all(|w| (w - 90.0).abs() < EPS));
    }

    #[test]
    fn test_every_ring_closes_and_is_contiguous() {
        let labels = HierarchyNode::interior((0..7).map(|c| {
            let subs = (0..3).map(move |s| {
                let leaves = (0..(c + s + 1)).map(|l| format!("{c}.{s}.{l}")).map(Label::new);
                (format!("{c}.{s}"), HierarchyNode::leaves(leaves))
            });
            (format!("cat{c}"), HierarchyNode::interior(subs))
        }));
        let (wheel, _) = build(&Dataset::new(ColorMap::default(), labels));

        for ring in [RingId::Inner, RingId::Middle, RingId::Outer] {
            let spans = spans(&wheel, ring);
            assert_eq!(spans[0].start, 0.0);
            for pair in spans.windows(2) {
                assert_eq!(pair[1].start, pair[0].end);
            }
            let total: f64 = spans.iter().map(Span::width).sum();
            assert!((total - 360.0).abs() < EPS, "{ring} sums to {total}");
            assert!((spans.last().unwrap().end - 360.0).abs() < EPS);
        }
    }

    #[test]
    fn test_depth_first_ids() {
        let (wheel, _) = build(&dataset());
        let order: Vec<(String, &str)> = wheel
            .sectors
            .iter()
            .map(|s| (s.id.to_string(), s.label.as_str()))
            .collect();
        assert_eq!(
            order,
            [
                ("s1".to_string(), "A"),
                ("s2".to_string(), "A1"),
                ("s3".to_string(), "a"),
                ("s4".to_string(), "b"),
                ("s5".to_string(), "A2"),
                ("s6".to_string(), "c"),
                ("s7".to_string(), "B"),
                ("s8".to_string(), "B1"),
                ("s9".to_string(), "d"),
            ]
        );
    }

    #[test]
    fn test_legend_arcs_use_color_map_with_fallback() {
        let (wheel, scene) = build(&dataset());
        assert_eq!(wheel.legend.len(), 2);
        assert_eq!(wheel.legend[0].color.as_str(), "red");
        assert_eq!(wheel.legend[1].color.as_str(), "black");
        assert!((wheel.legend[0].span.width() - 270.0).abs() < EPS);
        // 270 degrees needs the large-arc flag
        assert!(wheel.legend[0].path.contains(" 0 1 0 "));

        let color_group = scene.resolve("color").unwrap();
        assert_eq!(scene.children(color_group).len(), 2);
    }

    #[test]
    fn test_sector_elements() {
        let (_, scene) = build(&dataset());
        assert_eq!(scene.find_by_class("sector").len(), 9);
        assert_eq!(scene.find_by_class("outline").len(), 3);

        let midline = scene.resolve("s1-midline").unwrap();
        assert!(scene.element(midline).unwrap().has_class("midline"));

        let labels = scene.find_by_class("label");
        let first = scene.element(labels[0]).unwrap();
        assert_eq!(first.attribute("href"), Some("#s1-midline"));
        assert_eq!(first.attribute("startOffset"), Some("57%"));
        assert_eq!(first.text.as_deref(), Some("A"));

        let outer_label = scene.element(labels[2]).unwrap();
        assert_eq!(outer_label.attribute("startOffset"), Some("50%"));
    }

    #[test]
    fn test_first_spoke_points_up() {
        let (wheel, _) = build(&dataset());
        assert_eq!(wheel.sectors[0].spoke.as_str(), "M520,520 L520,320");
    }

    #[test]
    fn test_layout_is_deterministic() {
        let data = dataset();
        let (first_wheel, first) = build(&data);
        let (second_wheel, second) = build(&data);
        assert_eq!(first_wheel, second_wheel);
        assert_eq!(first.to_svg(), second.to_svg());
    }

    #[test]
    fn test_empty_leaf_group_is_zero_width() {
        let labels = HierarchyNode::interior([
            ("A", HierarchyNode::interior([("A1", HierarchyNode::leaves(["x"]))])),
            (
                "Empty",
                HierarchyNode::interior([("E1", HierarchyNode::leaves(Vec::<Label>::new()))]),
            ),
        ]);
        let (wheel, _) = build(&Dataset::new(ColorMap::default(), labels));
        let inner = spans(&wheel, RingId::Inner);
        assert_eq!(inner[1], Span::new(360.0, 360.0));
        assert_eq!(wheel.legend.len(), 2);
    }

    #[test]
    fn test_empty_hierarchy_draws_nothing() {
        let labels = HierarchyNode::interior(Vec::<(Label, HierarchyNode)>::new());
        let (wheel, scene) = build(&Dataset::new(ColorMap::default(), labels));
        assert!(wheel.sectors.is_empty());
        assert!(scene.find_by_class("sector").is_empty());
    }

    #[test]
    fn test_levels_beyond_three_rings_are_skipped() {
        let labels = HierarchyNode::interior([(
            "A",
            HierarchyNode::interior([(
                "A1",
                HierarchyNode::interior([("A1x", HierarchyNode::leaves(["deep"]))]),
            )]),
        )]);
        let (wheel, _) = build(&Dataset::new(ColorMap::default(), labels));
        assert_eq!(wheel.sectors.len(), 3);
        assert_eq!(wheel.ring_sectors(RingId::Outer).next().unwrap().label.as_str(), "A1x");
    }

    #[test]
    fn test_sample_data_closes_every_ring() {
        let data = Dataset::from_json_str(include_str!("../../../data/sample.json")).unwrap();
        let (wheel, scene) = build(&data);

        assert_eq!(wheel.total_leaves, 26);
        assert_eq!(wheel.legend.len(), 4);
        for ring in [RingId::Inner, RingId::Middle, RingId::Outer] {
            let end = wheel.ring_sectors(ring).last().unwrap().span.end;
            assert!((end - 360.0).abs() < EPS, "{ring} ends at {end}");
        }
        assert_eq!(scene.find_by_class("spoke").len(), wheel.sectors.len());
    }
}
