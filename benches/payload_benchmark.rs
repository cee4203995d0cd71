use criterion::{criterion_group, criterion_main, Criterion};
use gymtrack_relay::models::{DocumentEventData, PredefinedRoutineCreatedEvent};
use gymtrack_relay::services::build_new_routine_payload;
use std::hint::black_box;

fn event_body(exercises: usize) -> String {
    let values: Vec<_> = (0..exercises)
        .map(|i| {
            serde_json::json!({ "mapValue": { "fields": {
                "nombre": { "stringValue": format!("Ejercicio {i}") },
                "series": { "integerValue": "4" },
                "repeticiones": { "integerValue": "10" }
            } } })
        })
        .collect();

    serde_json::json!({
        "value": {
            "name": "projects/p/databases/(default)/documents/rutinas_predefinidas/leg-day",
            "fields": {
                "nombreRutina": { "stringValue": "Leg Day" },
                "nivel": { "stringValue": "avanzado" },
                "ejercicios": { "arrayValue": { "values": values } }
            }
        }
    })
    .to_string()
}

fn benchmark_event_to_push_message(c: &mut Criterion) {
    let small = event_body(3);
    let large = event_body(50);

    let mut group = c.benchmark_group("event_to_push_message");

    for (label, body) in [("3_exercises", &small), ("50_exercises", &large)] {
        group.bench_function(label, |b| {
            b.iter(|| {
                let data: DocumentEventData = serde_json::from_str(black_box(body)).unwrap();
                let event = PredefinedRoutineCreatedEvent::from_event_data(data).unwrap();
                build_new_routine_payload(event.routine_name()).to_push_message()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_event_to_push_message);
criterion_main!(benches);
