use clap::Args;
use eyre::{Result, bail};
use gwgen_codegen::{ArtifactKind, Generator, Plan};

use super::{RunArgs, report_failures};

#[derive(Args)]
pub struct PlanCommand {
    #[command(flatten)]
    pub args: RunArgs,
}

impl PlanCommand {
    pub fn run(&self) -> Result<()> {
        let settings = self.args.settings();
        let (set, mut registry) = self.args.prepare(&settings);

        let (plans, failures) =
            Generator::new(settings.options()).plan_all(&mut registry, &set.files);

        for plan in &plans {
            print!("{}", describe(plan));
        }

        if !failures.is_empty() {
            let count = failures.len();
            report_failures(failures);
            bail!("{count} of {} files failed", set.len());
        }
        Ok(())
    }
}

fn describe(plan: &Plan) -> String {
    let mut out = format!("{} ({})\n", plan.file, plan.outcome);
    for artifact in &plan.artifacts {
        match &artifact.kind {
            ArtifactKind::Gateway => {
                out.push_str(&format!(
                    "  gateway {} [{}]\n",
                    artifact.filename, artifact.package.path
                ));
                for import in &artifact.companion_imports {
                    out.push_str(&format!("    imports {import}\n"));
                }
            }
            ArtifactKind::AliasShim { target } => {
                out.push_str(&format!(
                    "  alias   {} -> {}\n",
                    artifact.filename, target.path
                ));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use gwgen_codegen::ArtifactPlanner;
    use gwgen_descriptor::{Binding, File, MessageRef, Method, PackageIdentity, Registry, Service};

    use super::*;

    fn example() -> File {
        File {
            name: "example.proto".into(),
            package: PackageIdentity::new("example.com/mymodule/foo/bar/v1", "v1gateway"),
            generated_filename_prefix: "foo/bar/v1/example".into(),
            services: vec![Service {
                name: "ExampleService".into(),
                methods: vec![Method {
                    name: "Example".into(),
                    input: MessageRef::local("ExampleMessage"),
                    output: MessageRef::local("ExampleMessage"),
                    bindings: vec![Binding {
                        http_method: "GET".into(),
                        path_template: "/v1/example".into(),
                        body: None,
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_describe_split() {
        let mut reg = Registry::new();
        reg.set_separate_package(true);
        reg.set_standalone(true);
        let plan = ArtifactPlanner::new().plan(&example(), &mut reg).unwrap();

        assert_eq!(
            describe(&plan),
            "example.proto (split)\n\
             \x20 gateway foo/bar/v1/v1gateway/example.pb.gw.go [example.com/mymodule/foo/bar/v1/v1gateway]\n\
             \x20   imports example.com/mymodule/foo/bar/v1/v1grpc\n\
             \x20 alias   foo/bar/v1/example.pb.gw.go -> example.com/mymodule/foo/bar/v1/v1gateway\n"
        );
    }

    #[test]
    fn test_describe_empty() {
        let mut file = example();
        file.services.clear();
        let plan = ArtifactPlanner::new().plan(&file, &mut Registry::new()).unwrap();

        assert_eq!(describe(&plan), "example.proto (empty)\n");
    }
}
