use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFile,
    term::{
        self,
        termcolor::{ColorChoice, StandardStream},
    },
};
use naga::{
    front::wgsl,
    valid::{Capabilities, ModuleInfo, ValidationFlags, Validator},
    Module, ShaderStage,
};
use orrery_routine::shaders::{self, PROGRAMS};

fn print_error(label: &str, source: &str, error: &naga::WithSpan<naga::valid::ValidationError>) {
    let files = SimpleFile::new(label, source);
    let config = term::Config::default();
    let writer = StandardStream::stderr(ColorChoice::Auto);

    let diagnostic = Diagnostic::error().with_labels(
        error
            .spans()
            .map(|(span, desc)| Label::primary((), span.to_range().unwrap_or_default()).with_message(desc.to_owned()))
            .collect(),
    );

    term::emit(&mut writer.lock(), &config, &files, &diagnostic).expect("cannot write error");
}

fn validate(label: &str, source: &str) -> (Module, ModuleInfo) {
    let module = match wgsl::parse_str(source) {
        Ok(module) => module,
        Err(e) => {
            e.emit_to_stderr_with_path(source, label);
            panic!("{label} failed to parse");
        }
    };
    let info = match Validator::new(ValidationFlags::all(), Capabilities::empty()).validate(&module) {
        Ok(info) => info,
        Err(e) => {
            print_error(label, source, &e);
            panic!("{label} failed validation");
        }
    };
    (module, info)
}

#[test]
fn every_program_validates() {
    for (label, files) in PROGRAMS {
        let source = shaders::compose(files).unwrap();
        let (module, _) = validate(label, &source);

        let stages: Vec<_> = module
            .entry_points
            .iter()
            .map(|entry| (entry.name.as_str(), entry.stage))
            .collect();
        assert!(stages.contains(&("vs_main", ShaderStage::Vertex)), "{label} has no vertex entry");
        assert!(
            stages.contains(&("fs_main", ShaderStage::Fragment)),
            "{label} has no fragment entry"
        );
    }
}

#[test]
fn light_block_matches_host_layout() {
    let source = shaders::compose(shaders::LIT).unwrap();
    let (module, _) = validate("lit", &source);

    let lights = module
        .global_variables
        .iter()
        .find(|(_, var)| var.name.as_deref() == Some("lights"))
        .map(|(_, var)| var.ty)
        .expect("lit program binds the light block");
    let size = module.types[lights].inner.size(module.to_ctx());
    assert_eq!(size as usize, std::mem::size_of::<orrery::LightUniform>());

    let object = module
        .global_variables
        .iter()
        .find(|(_, var)| var.name.as_deref() == Some("object"))
        .map(|(_, var)| var.ty)
        .expect("lit program binds the object block");
    let size = module.types[object].inner.size(module.to_ctx());
    assert_eq!(size as usize, std::mem::size_of::<orrery::ObjectUniform>());
}

#[test]
fn material_samplers_match_lit_bindings() {
    let source = shaders::compose(shaders::LIT).unwrap();
    let (module, _) = validate("lit", &source);

    for (slot, name) in orrery::MATERIAL_SAMPLERS.iter().enumerate() {
        let binding = module
            .global_variables
            .iter()
            .find(|(_, var)| var.name.as_deref() == Some(*name))
            .and_then(|(_, var)| var.binding.clone())
            .unwrap_or_else(|| panic!("lit program has no {name}"));
        assert_eq!(binding.group, orrery::MATERIAL_GROUP);
        assert_eq!(binding.binding, slot as u32);
    }
}
