//! Drawing of data layers on top of the [`walkers::Map`], together with the click interaction
//! and the info popup.

use egui::{
    Align2, Area, Color32, CursorIcon, Frame, Grid, Mesh, Order, Painter, PointerButton, Pos2,
    Response, RichText, Shape, Stroke, Ui, pos2,
};
use lyon_path::{Path, math::point};
use lyon_tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers};
use walkers::{MapMemory, Plugin, Position, Projector, lon_lat};

use crate::data::{Coordinate, Geometry};
use crate::encoding::Symbol;
use crate::hit::{self, nearest_longitude, unwrap_antimeridian};
use crate::layers::{Layer, Layers, Source, SourceFeature, Surface as _};
use crate::popup::Popup;

/// Draws visible layers and opens a popup for the clicked feature.
pub struct DataLayers<'a> {
    layers: &'a mut Layers,
    reference_lon: f64,
}

impl<'a> DataLayers<'a> {
    /// Features are drawn on the copy of the world nearest to `reference_lon`.
    pub fn new(layers: &'a mut Layers, reference_lon: f64) -> Self {
        Self {
            layers,
            reference_lon,
        }
    }
}

impl Plugin for DataLayers<'_> {
    fn run(
        self: Box<Self>,
        ui: &mut Ui,
        response: &Response,
        projector: &Projector,
        map_memory: &MapMemory,
    ) {
        let painter = ui.painter_at(response.rect);
        let screen = ScreenProjection {
            projector,
            reference_lon: self.reference_lon,
        };

        for (layer, source) in self.layers.visible() {
            for feature in &source.features {
                draw_feature(&painter, &screen, layer, feature);
            }
        }

        if let Some(hover) = response.hover_pos() {
            if feature_at(self.layers, &screen, hover).is_some() {
                ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
            }
        }

        if !response.changed() && response.clicked_by(PointerButton::Primary) {
            if let Some(pointer) = response.interact_pointer_pos() {
                match feature_at(self.layers, &screen, pointer) {
                    Some(popup) => self.layers.show_popup(popup),
                    None => self.layers.close_popups(),
                }
            }
        }

        if show_popup(ui, projector, self.layers.popup()) {
            self.layers.close_popups();
        }

        if let Some(center) = map_memory.detached() {
            draw_scale_bar(&painter, response.rect, projector.scale_pixel_per_meter(center));
        }
    }
}

/// Geographic coordinates to screen positions, using the copy of the world nearest to
/// `reference_lon`.
struct ScreenProjection<'p> {
    projector: &'p Projector,
    reference_lon: f64,
}

impl ScreenProjection<'_> {
    fn position(&self, [lon, lat]: Coordinate) -> Position {
        lon_lat(nearest_longitude(lon, self.reference_lon), lat)
    }

    fn point(&self, coordinate: Coordinate) -> Pos2 {
        self.projector.project(self.position(coordinate)).to_pos2()
    }

    fn line(&self, coordinates: &[Coordinate]) -> Vec<Pos2> {
        unwrap_antimeridian(coordinates, self.reference_lon)
            .into_iter()
            .map(|[lon, lat]| self.projector.project(lon_lat(lon, lat)).to_pos2())
            .collect()
    }

    /// Screen rings of a polygon, without the duplicated closing vertices.
    fn rings(&self, rings: &[Vec<Coordinate>]) -> Vec<Vec<Pos2>> {
        rings
            .iter()
            .map(|ring| {
                let mut points = self.line(ring);
                if points.len() > 1 && points.first() == points.last() {
                    points.pop();
                }
                points
            })
            .filter(|points| points.len() >= 3)
            .collect()
    }
}

fn draw_feature(
    painter: &Painter,
    screen: &ScreenProjection<'_>,
    layer: &Layer,
    feature: &SourceFeature,
) {
    let symbol = layer.paint.evaluate(feature.measurement);

    match (&feature.geometry, symbol) {
        (
            Geometry::Point(coordinate),
            Symbol::Circle {
                radius,
                fill,
                stroke,
            },
        ) => {
            painter.circle(screen.point(*coordinate), radius, fill, stroke);
        }
        (Geometry::LineString(coordinates), Symbol::Line { stroke }) => {
            painter.add(Shape::line(screen.line(coordinates), stroke));
        }
        (Geometry::Polygon(rings), Symbol::Fill { fill }) => {
            if let Some(mesh) = tessellate(&screen.rings(rings), fill) {
                painter.add(Shape::mesh(mesh));
            }
        }
        (geometry, symbol) => {
            log::trace!("Layer '{}' cannot draw {geometry:?} as {symbol:?}.", layer.id);
        }
    }
}

/// Fill mesh of a polygon with holes.
fn tessellate(rings: &[Vec<Pos2>], color: Color32) -> Option<Mesh> {
    let mut builder = Path::builder();
    for ring in rings {
        let Some((first, rest)) = ring.split_first() else {
            continue;
        };
        builder.begin(point(first.x, first.y));
        for p in rest {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(true);
    }
    let path = builder.build();

    let mut buffers: VertexBuffers<Pos2, u32> = VertexBuffers::new();
    FillTessellator::new()
        .tessellate_path(
            &path,
            &FillOptions::default(),
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex<'_>| {
                let p = vertex.position();
                pos2(p.x, p.y)
            }),
        )
        .map_err(|err| log::debug!("Could not tessellate a polygon: {err:?}"))
        .ok()?;

    let mut mesh = Mesh::default();
    for vertex in buffers.vertices {
        mesh.colored_vertex(vertex, color);
    }
    mesh.indices = buffers.indices;
    Some(mesh)
}

/// Topmost visible feature under `pointer`, as a popup to open.
fn feature_at(layers: &Layers, screen: &ScreenProjection<'_>, pointer: Pos2) -> Option<Popup> {
    layers.visible().rev().find_map(|(layer, source)| {
        let feature = hit_feature(screen, layer, source, pointer)?;
        let anchor = match feature.geometry {
            Geometry::Point(coordinate) => screen.position(coordinate),
            _ => screen.projector.unproject(pointer.to_vec2()),
        };
        Some(Popup {
            anchor,
            content: feature.popup.clone(),
        })
    })
}

fn hit_feature<'s>(
    screen: &ScreenProjection<'_>,
    layer: &Layer,
    source: &'s Source,
    pointer: Pos2,
) -> Option<&'s SourceFeature> {
    source.features.iter().rev().find(|feature| {
        match (&feature.geometry, layer.paint.evaluate(feature.measurement)) {
            (Geometry::Point(coordinate), Symbol::Circle { radius, .. }) => {
                hit::circle_contains(screen.point(*coordinate), radius, pointer)
            }
            (Geometry::LineString(coordinates), Symbol::Line { stroke }) => {
                hit::polyline_contains(&screen.line(coordinates), stroke.width / 2.0, pointer)
            }
            (Geometry::Polygon(rings), Symbol::Fill { .. }) => {
                hit::polygon_contains(&screen.rings(rings), pointer)
            }
            _ => false,
        }
    })
}

/// Show the popup, if any. Returns `true` if user asked to close it.
fn show_popup(ui: &Ui, projector: &Projector, popup: Option<&Popup>) -> bool {
    let Some(popup) = popup else {
        return false;
    };

    let mut close = false;
    let content = &popup.content;

    Area::new(ui.id().with("feature_popup"))
        .order(Order::Foreground)
        .fixed_pos(projector.project(popup.anchor).to_pos2())
        .pivot(Align2::CENTER_BOTTOM)
        .show(ui.ctx(), |ui| {
            Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(format!("{} {}", content.symbol, content.title));
                    if ui.small_button("✖").clicked() {
                        close = true;
                    }
                });

                Grid::new("feature_popup_rows")
                    .num_columns(2)
                    .show(ui, |ui| {
                        for row in &content.rows {
                            ui.strong(format!("{}:", row.label));
                            if row.emphasized {
                                ui.label(
                                    RichText::new(&row.value)
                                        .strong()
                                        .color(Color32::from_rgb(0x34, 0x98, 0xdb)),
                                );
                            } else {
                                ui.label(&row.value);
                            }
                            ui.end_row();
                        }
                    });
            });
        });

    close
}

/// Length of the scale bar, at most `max_width` pixels long, and its label.
pub fn scale_bar(pixels_per_meter: f32, max_width: f32) -> Option<(f32, String)> {
    if !(pixels_per_meter.is_finite() && pixels_per_meter > 0.0) {
        return None;
    }

    let max_meters = f64::from(max_width / pixels_per_meter);
    let magnitude = 10_f64.powf(max_meters.log10().floor());
    let meters = [5.0, 2.0, 1.0]
        .into_iter()
        .map(|step| step * magnitude)
        .find(|meters| *meters <= max_meters)?;

    let label = if meters >= 1000.0 {
        format!("{} km", meters / 1000.0)
    } else {
        format!("{meters} m")
    };

    Some((meters as f32 * pixels_per_meter, label))
}

fn draw_scale_bar(painter: &Painter, rect: egui::Rect, pixels_per_meter: f32) {
    let Some((width, label)) = scale_bar(pixels_per_meter, 100.0) else {
        return;
    };

    let left = rect.left_bottom() + egui::vec2(10.0, -50.0);
    let right = left + egui::vec2(width, 0.0);
    let stroke = Stroke::new(2.0, Color32::from_gray(40));

    painter.line_segment([left, right], stroke);
    painter.line_segment([left, left - egui::vec2(0.0, 6.0)], stroke);
    painter.line_segment([right, right - egui::vec2(0.0, 6.0)], stroke);
    painter.text(
        left - egui::vec2(0.0, 8.0),
        Align2::LEFT_BOTTOM,
        label,
        egui::FontId::proportional(12.0),
        Color32::from_gray(40),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Properties as _, SalmonPopulation, TemperatureAnomaly};
    use crate::encoding::paint;
    use crate::layers::{LayerId, Surface as _};
    use approx::assert_relative_eq;
    use egui::{Rect, Vec2};

    const CENTER: Coordinate = [-140.0, 55.0];

    fn projector() -> Projector {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::splat(512.0));
        let mut memory = MapMemory::default();
        memory.set_zoom(6.0).unwrap();
        Projector::new(rect, &memory, lon_lat(CENTER[0], CENTER[1]))
    }

    fn salmon(coordinate: Coordinate) -> Source {
        Source {
            features: vec![SourceFeature {
                geometry: Geometry::Point(coordinate),
                measurement: Some(500.0),
                popup: SalmonPopulation::default().popup(),
            }],
        }
    }

    fn anomaly() -> Source {
        let ring = vec![
            [-145.0, 50.0],
            [-135.0, 50.0],
            [-135.0, 60.0],
            [-145.0, 60.0],
            [-145.0, 50.0],
        ];
        Source {
            features: vec![SourceFeature {
                geometry: Geometry::Polygon(vec![ring]),
                measurement: Some(2.0),
                popup: TemperatureAnomaly::default().popup(),
            }],
        }
    }

    /// Salmon point in the middle of the view, covered by a temperature anomaly.
    fn layers() -> Layers {
        let mut layers = Layers::default();
        for (id, source) in [
            (LayerId::SalmonPopulations, salmon(CENTER)),
            (LayerId::TemperatureAnomalies, anomaly()),
        ] {
            layers.add_source(id, source);
            layers.add_layer(Layer::new(id, paint(id)));
        }
        layers
    }

    fn click(layers: &Layers, pointer: Pos2) -> Option<Popup> {
        let projector = projector();
        let screen = ScreenProjection {
            projector: &projector,
            reference_lon: CENTER[0],
        };
        feature_at(layers, &screen, pointer)
    }

    #[test]
    fn topmost_layer_wins() {
        let popup = click(&layers(), pos2(256.0, 256.0)).unwrap();
        assert_eq!(popup.content.title, "Temperature Anomaly");

        // Polygons open where they were clicked.
        assert_relative_eq!(popup.anchor.x(), CENTER[0], epsilon = 1e-6);
        assert_relative_eq!(popup.anchor.y(), CENTER[1], epsilon = 1e-6);
    }

    #[test]
    fn polygon_is_hit_away_from_its_center() {
        let mut layers = layers();
        layers.set_visibility(LayerId::SalmonPopulations, false);

        let popup = click(&layers, pos2(300.0, 200.0)).unwrap();
        assert_eq!(popup.content.title, "Temperature Anomaly");
        assert!(popup.anchor.x() > CENTER[0]);
        assert!(popup.anchor.y() > CENTER[1]);
    }

    #[test]
    fn hidden_layers_are_not_hit() {
        let mut layers = layers();
        layers.set_visibility(LayerId::TemperatureAnomalies, false);

        let popup = click(&layers, pos2(258.0, 255.0)).unwrap();
        assert_eq!(popup.content.title, "Salmon Population");
        assert_eq!(popup.anchor, lon_lat(CENTER[0], CENTER[1]));
    }

    #[test]
    fn point_across_the_antimeridian_is_hit_on_the_visible_copy() {
        let mut layers = Layers::default();
        layers.add_source(LayerId::SalmonPopulations, salmon([220.0, 55.0]));
        layers.add_layer(Layer::new(
            LayerId::SalmonPopulations,
            paint(LayerId::SalmonPopulations),
        ));

        let popup = click(&layers, pos2(256.0, 256.0)).unwrap();
        assert_eq!(popup.anchor, lon_lat(CENTER[0], CENTER[1]));
    }

    #[test]
    fn clicking_empty_map_hits_nothing() {
        assert_eq!(click(&layers(), pos2(5.0, 5.0)), None);
        assert_eq!(click(&Layers::default(), pos2(256.0, 256.0)), None);
    }

    #[test]
    fn scale_bar_uses_round_distances() {
        // At most 125 km fits.
        let (width, label) = scale_bar(0.0008, 100.0).unwrap();
        assert_relative_eq!(width, 80.0, max_relative = 1e-4);
        assert_eq!(label, "100 km");

        // At most 333 m fits.
        let (width, label) = scale_bar(0.3, 100.0).unwrap();
        assert_relative_eq!(width, 60.0, max_relative = 1e-4);
        assert_eq!(label, "200 m");
    }

    #[test]
    fn no_scale_bar_for_degenerate_scale() {
        assert_eq!(scale_bar(0.0, 100.0), None);
        assert_eq!(scale_bar(f32::NAN, 100.0), None);
    }

    #[test]
    fn tessellating_a_square() {
        let square = vec![
            pos2(0.0, 0.0),
            pos2(10.0, 0.0),
            pos2(10.0, 10.0),
            pos2(0.0, 10.0),
        ];
        let mesh = tessellate(&[square], Color32::RED).unwrap();
        assert_eq!(mesh.indices.len(), 6);
        assert!(mesh.vertices.iter().all(|v| v.color == Color32::RED));
    }
}
