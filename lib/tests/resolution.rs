use classir::hierarchy::{FunctionGroupId, Hierarchy, HierarchyArenas, MethodId};
use classir::hierarchy::{MissingAncestorPolicy, Settings};
use classir::insn::{Constant, Instruction, InstructionKind, IntOperation};
use classir::jvm::opcodes::*;
use classir::jvm::{BinaryName, Error, InvalidInstruction, MethodDescriptor, Name};
use classir::jvm::{ParseDescriptor, RawClass, RawConstant, RawHandle, RawInstruction};
use classir::jvm::{RawInstructionKind, RawMethod, UnqualifiedName};

const ACC_PUBLIC: u16 = 0x0001;
const ACC_STATIC: u16 = 0x0008;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn class(
    name: &str,
    superclass: Option<&str>,
    interfaces: &[&str],
    methods: Vec<RawMethod>,
) -> RawClass {
    RawClass {
        name: name.to_owned(),
        superclass: superclass.map(str::to_owned),
        interfaces: interfaces.iter().map(|name| (*name).to_owned()).collect(),
        access_flags: ACC_PUBLIC,
        methods,
    }
}

fn interface(name: &str, superinterfaces: &[&str], methods: Vec<RawMethod>) -> RawClass {
    RawClass {
        access_flags: ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT,
        ..class(name, Some("java/lang/Object"), superinterfaces, methods)
    }
}

fn method(name: &str, descriptor: &str) -> RawMethod {
    RawMethod {
        name: name.to_owned(),
        descriptor: descriptor.to_owned(),
        access_flags: ACC_PUBLIC,
        instructions: vec![RawInstruction::Insn { opcode: RETURN }],
    }
}

fn static_method(name: &str, descriptor: &str) -> RawMethod {
    RawMethod {
        access_flags: ACC_PUBLIC | ACC_STATIC,
        ..method(name, descriptor)
    }
}

fn lookup<'g>(
    hierarchy: &'g Hierarchy<'g>,
    class: &str,
    name: &str,
    descriptor: &str,
) -> MethodId<'g> {
    let class = BinaryName::from_string(class.to_owned()).expect("class name");
    let name = UnqualifiedName::from_string(name.to_owned()).expect("method name");
    let descriptor = MethodDescriptor::parse(descriptor).expect("method descriptor");
    hierarchy
        .find_method(&class, &name, &descriptor)
        .expect("method is declared")
}

fn group_of<'g>(
    hierarchy: &'g Hierarchy<'g>,
    class: &str,
    name: &str,
    descriptor: &str,
) -> FunctionGroupId<'g> {
    lookup(hierarchy, class, name, descriptor)
        .group()
        .expect("method is resolved")
}

#[test]
fn override_chain_shares_one_group() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let hierarchy = Hierarchy::new(&arenas, Settings::new());
    hierarchy
        .add_raw_class(&class(
            "demo/Base",
            Some("java/lang/Object"),
            &[],
            vec![method("foo", "()V")],
        ))
        .expect("base");
    hierarchy
        .add_raw_class(&class(
            "demo/Mid",
            Some("demo/Base"),
            &[],
            vec![method("foo", "()V")],
        ))
        .expect("mid");
    hierarchy
        .add_raw_class(&class(
            "demo/Leaf",
            Some("demo/Mid"),
            &[],
            vec![method("foo", "()V")],
        ))
        .expect("leaf");
    hierarchy.resolve_all().expect("resolution succeeds");

    let base = group_of(&hierarchy, "demo/Base", "foo", "()V");
    let mid = group_of(&hierarchy, "demo/Mid", "foo", "()V");
    let leaf = group_of(&hierarchy, "demo/Leaf", "foo", "()V");
    assert_eq!(base, mid);
    assert_eq!(mid, leaf);
    assert_eq!(base.0.len(), 3);

    let edges = hierarchy.inheritance_edges();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].parent, lookup(&hierarchy, "demo/Base", "foo", "()V"));
    assert_eq!(edges[0].child, lookup(&hierarchy, "demo/Mid", "foo", "()V"));
    assert_eq!(edges[1].parent, lookup(&hierarchy, "demo/Mid", "foo", "()V"));
    assert_eq!(edges[1].child, lookup(&hierarchy, "demo/Leaf", "foo", "()V"));
}

#[test]
fn classes_added_out_of_order_are_resolved_ancestors_first() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let hierarchy = Hierarchy::new(&arenas, Settings::new());
    hierarchy
        .add_raw_class(&class(
            "demo/Leaf",
            Some("demo/Mid"),
            &["demo/Named"],
            vec![method("name", "()Ljava/lang/String;")],
        ))
        .expect("leaf");
    hierarchy
        .add_raw_class(&class("demo/Mid", Some("demo/Base"), &[], vec![]))
        .expect("mid");
    hierarchy
        .add_raw_class(&interface(
            "demo/Named",
            &[],
            vec![method("name", "()Ljava/lang/String;")],
        ))
        .expect("named");
    hierarchy
        .add_raw_class(&class("demo/Base", Some("java/lang/Object"), &[], vec![]))
        .expect("base");

    let order: Vec<String> = hierarchy
        .resolution_order()
        .expect("acyclic")
        .into_iter()
        .map(|class| class.name.as_str().to_owned())
        .collect();
    assert_eq!(order, vec!["demo/Base", "demo/Mid", "demo/Named", "demo/Leaf"]);

    hierarchy.resolve_all().expect("resolution succeeds");
    assert_eq!(
        group_of(&hierarchy, "demo/Leaf", "name", "()Ljava/lang/String;"),
        group_of(&hierarchy, "demo/Named", "name", "()Ljava/lang/String;")
    );
}

#[test]
fn conflicting_interface_groups() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let hierarchy = Hierarchy::new(&arenas, Settings::new());
    let i1 = hierarchy
        .add_raw_class(&interface("demo/I1", &[], vec![method("m", "()I")]))
        .expect("I1");
    let i2 = hierarchy
        .add_raw_class(&interface("demo/I2", &[], vec![method("m", "()I")]))
        .expect("I2");
    let c = hierarchy
        .add_raw_class(&class(
            "demo/C",
            Some("java/lang/Object"),
            &["demo/I1", "demo/I2"],
            vec![method("m", "()I")],
        ))
        .expect("C");

    hierarchy.resolve_class(i1).expect("I1 resolves");
    hierarchy.resolve_class(i2).expect("I2 resolves");
    assert_ne!(
        group_of(&hierarchy, "demo/I1", "m", "()I"),
        group_of(&hierarchy, "demo/I2", "m", "()I")
    );

    match hierarchy.resolve_class(c) {
        Err(Error::ConflictingGroup { ancestor, .. }) => assert_eq!(ancestor.as_str(), "demo/I2"),
        other => panic!("expected a conflicting group, got {:?}", other),
    }
    assert!(lookup(&hierarchy, "demo/C", "m", "()I").group().is_none());
}

#[test]
fn resolve_all_aborts_on_conflict() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let hierarchy = Hierarchy::new(&arenas, Settings::new());
    hierarchy
        .add_raw_class(&class(
            "demo/Base",
            Some("java/lang/Object"),
            &[],
            vec![method("run", "()V")],
        ))
        .expect("base");
    hierarchy
        .add_raw_class(&interface("demo/Task", &[], vec![method("run", "()V")]))
        .expect("task");
    hierarchy
        .add_raw_class(&class(
            "demo/Job",
            Some("demo/Base"),
            &["demo/Task"],
            vec![method("run", "()V")],
        ))
        .expect("job");

    assert!(matches!(
        hierarchy.resolve_all(),
        Err(Error::ConflictingGroup { .. })
    ));
}

#[test]
fn unresolved_ancestor() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let hierarchy = Hierarchy::new(&arenas, Settings::new());
    hierarchy
        .add_raw_class(&class(
            "demo/Base",
            Some("java/lang/Object"),
            &[],
            vec![method("foo", "(J)V")],
        ))
        .expect("base");
    let child = hierarchy
        .add_raw_class(&class(
            "demo/Child",
            Some("demo/Base"),
            &[],
            vec![method("foo", "(J)V")],
        ))
        .expect("child");

    match hierarchy.resolve_class(child) {
        Err(Error::UnresolvedAncestor { method, ancestor }) => {
            assert_eq!(method, "demo/Child.foo:(J)V");
            assert_eq!(ancestor.as_str(), "demo/Base");
        }
        other => panic!("expected an unresolved ancestor, got {:?}", other),
    }
}

#[test]
fn unrelated_classes_get_distinct_groups() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let hierarchy = Hierarchy::new(&arenas, Settings::new());
    hierarchy
        .add_raw_class(&class(
            "demo/Left",
            Some("java/lang/Object"),
            &[],
            vec![method("size", "()I")],
        ))
        .expect("left");
    hierarchy
        .add_raw_class(&class(
            "demo/Right",
            Some("java/lang/Object"),
            &[],
            vec![method("size", "()I")],
        ))
        .expect("right");
    hierarchy.resolve_all().expect("resolution succeeds");

    let left = group_of(&hierarchy, "demo/Left", "size", "()I");
    let right = group_of(&hierarchy, "demo/Right", "size", "()I");
    assert_ne!(left, right);
    assert_eq!(left.name(), right.name());
    assert!(hierarchy.inheritance_edges().is_empty());
}

#[test]
fn non_virtual_methods_get_fresh_groups() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let hierarchy = Hierarchy::new(&arenas, Settings::new());
    hierarchy
        .add_raw_class(&class(
            "demo/Base",
            Some("java/lang/Object"),
            &[],
            vec![method("<init>", "()V"), method("helper", "()V")],
        ))
        .expect("base");
    hierarchy
        .add_raw_class(&class(
            "demo/Child",
            Some("demo/Base"),
            &[],
            vec![method("<init>", "()V"), static_method("helper", "()V")],
        ))
        .expect("child");
    hierarchy.resolve_all().expect("resolution succeeds");

    assert_ne!(
        group_of(&hierarchy, "demo/Base", "helper", "()V"),
        group_of(&hierarchy, "demo/Child", "helper", "()V")
    );
    assert_ne!(
        group_of(&hierarchy, "demo/Base", "<init>", "()V"),
        group_of(&hierarchy, "demo/Child", "<init>", "()V")
    );
    assert!(lookup(&hierarchy, "demo/Child", "<init>", "()V").is_constructor());
    assert!(lookup(&hierarchy, "demo/Child", "helper", "()V").is_static());
}

#[test]
fn static_ancestor_methods_are_looked_past() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let hierarchy = Hierarchy::new(&arenas, Settings::new());
    hierarchy
        .add_raw_class(&class(
            "demo/Base",
            Some("java/lang/Object"),
            &[],
            vec![method("id", "()I")],
        ))
        .expect("base");
    hierarchy
        .add_raw_class(&class(
            "demo/Mid",
            Some("demo/Base"),
            &[],
            vec![static_method("id", "()I")],
        ))
        .expect("mid");
    hierarchy
        .add_raw_class(&class(
            "demo/Leaf",
            Some("demo/Mid"),
            &[],
            vec![method("id", "()I")],
        ))
        .expect("leaf");
    hierarchy.resolve_all().expect("resolution succeeds");

    assert_eq!(
        group_of(&hierarchy, "demo/Base", "id", "()I"),
        group_of(&hierarchy, "demo/Leaf", "id", "()I")
    );
}

#[test]
fn diamonds_resolve_the_same_with_or_without_deduplication() {
    init_logging();
    for deduplicate_ancestor_visits in [true, false] {
        let arenas = HierarchyArenas::new();
        let mut settings = Settings::new();
        settings.deduplicate_ancestor_visits = deduplicate_ancestor_visits;
        let hierarchy = Hierarchy::new(&arenas, settings);
        hierarchy
            .add_raw_class(&interface("demo/Top", &[], vec![method("m", "()V")]))
            .expect("top");
        hierarchy
            .add_raw_class(&interface("demo/Left", &["demo/Top"], vec![]))
            .expect("left");
        hierarchy
            .add_raw_class(&interface("demo/Right", &["demo/Top"], vec![]))
            .expect("right");
        hierarchy
            .add_raw_class(&class(
                "demo/Impl",
                Some("java/lang/Object"),
                &["demo/Left", "demo/Right"],
                vec![method("m", "()V")],
            ))
            .expect("impl");
        hierarchy.resolve_all().expect("resolution succeeds");

        let top = group_of(&hierarchy, "demo/Top", "m", "()V");
        assert_eq!(top, group_of(&hierarchy, "demo/Impl", "m", "()V"));
        assert_eq!(top.0.len(), 2);
        assert_eq!(hierarchy.inheritance_edges().len(), 1);
    }
}

#[test]
fn edges_can_be_turned_off() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let mut settings = Settings::new();
    settings.record_inheritance_edges = false;
    let hierarchy = Hierarchy::new(&arenas, settings);
    hierarchy
        .add_raw_class(&class(
            "demo/Base",
            Some("java/lang/Object"),
            &[],
            vec![method("foo", "()V")],
        ))
        .expect("base");
    hierarchy
        .add_raw_class(&class(
            "demo/Child",
            Some("demo/Base"),
            &[],
            vec![method("foo", "()V")],
        ))
        .expect("child");
    hierarchy.resolve_all().expect("resolution succeeds");
    assert!(hierarchy.inheritance_edges().is_empty());
}

#[test]
fn strict_missing_ancestors() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let mut settings = Settings::new();
    settings.missing_ancestors = MissingAncestorPolicy::Fail;
    let hierarchy = Hierarchy::new(&arenas, settings);
    hierarchy
        .add_raw_class(&class(
            "demo/Base",
            Some("java/lang/Object"),
            &[],
            vec![method("foo", "()V")],
        ))
        .expect("base");

    match hierarchy.resolve_all() {
        Err(Error::MissingAncestor { class, ancestor }) => {
            assert_eq!(class.as_str(), "demo/Base");
            assert_eq!(ancestor, BinaryName::OBJECT);
        }
        other => panic!("expected a missing ancestor, got {:?}", other),
    }
}

#[test]
fn cycles_are_rejected() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let hierarchy = Hierarchy::new(&arenas, Settings::new());
    hierarchy
        .add_raw_class(&class("demo/A", Some("demo/B"), &[], vec![method("foo", "()V")]))
        .expect("A");
    let b = hierarchy
        .add_raw_class(&class("demo/B", Some("demo/A"), &[], vec![]))
        .expect("B");

    assert!(matches!(
        hierarchy.resolution_order(),
        Err(Error::CyclicHierarchy(_))
    ));
    assert!(matches!(
        hierarchy.resolve_all(),
        Err(Error::CyclicHierarchy(_))
    ));
    assert!(matches!(
        hierarchy.resolve_class(b),
        Err(Error::CyclicHierarchy(_))
    ));
}

#[test]
fn resolution_happens_once() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let hierarchy = Hierarchy::new(&arenas, Settings::new());
    let base = hierarchy
        .add_raw_class(&class(
            "demo/Base",
            Some("java/lang/Object"),
            &[],
            vec![method("foo", "()V")],
        ))
        .expect("base");
    hierarchy.resolve_all().expect("first resolution");

    assert!(matches!(
        hierarchy.resolve_all(),
        Err(Error::ClassAlreadyResolved(_))
    ));
    assert!(matches!(
        hierarchy.resolve_class(base),
        Err(Error::ClassAlreadyResolved(_))
    ));
    assert!(matches!(
        hierarchy.add_raw_class(&class("demo/Base", None, &[], vec![])),
        Err(Error::DuplicateClass(_))
    ));
    assert_eq!(group_of(&hierarchy, "demo/Base", "foo", "()V").0.len(), 1);
}

#[test]
fn duplicate_methods_are_rejected() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let hierarchy = Hierarchy::new(&arenas, Settings::new());
    let result = hierarchy.add_raw_class(&class(
        "demo/Twice",
        Some("java/lang/Object"),
        &[],
        vec![method("foo", "()V"), static_method("foo", "()V")],
    ));
    assert!(matches!(result, Err(Error::DuplicateMethod(_))));
}

#[test]
fn malformed_skeletons() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let hierarchy = Hierarchy::new(&arenas, Settings::new());
    assert!(matches!(
        hierarchy.add_raw_class(&class("demo.Dotted", None, &[], vec![])),
        Err(Error::MalformedName(_))
    ));
    assert!(matches!(
        hierarchy.add_raw_class(&class("demo/Fine", None, &[], vec![method("foo", "(V)V")])),
        Err(Error::MalformedDescriptor(_))
    ));
}

fn absolute_value() -> RawMethod {
    let load = RawInstruction::Var {
        opcode: ILOAD,
        index: 1,
    };
    let mut abs = method("abs", "(I)I");
    abs.instructions = vec![
        RawInstruction::Label(0),
        RawInstruction::LineNumber { line: 12, start: 0 },
        load.clone(),
        RawInstruction::Jump {
            opcode: IFGE,
            label: 1,
        },
        load.clone(),
        RawInstruction::Insn { opcode: INEG },
        RawInstruction::Insn { opcode: IRETURN },
        RawInstruction::Label(1),
        RawInstruction::Frame,
        load,
        RawInstruction::Insn { opcode: IRETURN },
    ];
    abs
}

#[test]
fn branching_bodies_resolve() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let hierarchy = Hierarchy::new(&arenas, Settings::new());
    hierarchy
        .add_raw_class(&class(
            "demo/Base",
            Some("java/lang/Object"),
            &[],
            vec![absolute_value()],
        ))
        .expect("base");
    hierarchy
        .add_raw_class(&class("demo/Child", Some("demo/Base"), &[], vec![absolute_value()]))
        .expect("child");
    hierarchy.resolve_all().expect("resolution succeeds");

    assert_eq!(
        group_of(&hierarchy, "demo/Base", "abs", "(I)I"),
        group_of(&hierarchy, "demo/Child", "abs", "(I)I")
    );

    let child = lookup(&hierarchy, "demo/Child", "abs", "(I)I");
    let kinds: Vec<InstructionKind> = child.instructions().iter().map(Instruction::kind).collect();
    assert_eq!(kinds[0], InstructionKind::Label);
    assert_eq!(kinds[1], InstructionKind::LineNumber);
    assert_eq!(kinds[3], InstructionKind::Jump);
    assert_eq!(kinds[8], InstructionKind::Frame);
    assert_eq!(child.dump().instructions, absolute_value().instructions);
    let raw_kinds: Vec<RawInstructionKind> = child
        .raw_instructions()
        .iter()
        .map(RawInstruction::kind)
        .collect();
    assert_eq!(raw_kinds[3], RawInstructionKind::Jump);
}

#[test]
fn broken_switches_fail_resolution() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let hierarchy = Hierarchy::new(&arenas, Settings::new());
    let mut pick = static_method("pick", "(I)V");
    pick.instructions = vec![
        RawInstruction::Var {
            opcode: ILOAD,
            index: 0,
        },
        RawInstruction::LookupSwitch {
            default: 0,
            keys: vec![3, 1],
            labels: vec![0, 0],
        },
        RawInstruction::Label(0),
        RawInstruction::Insn { opcode: RETURN },
    ];
    hierarchy
        .add_raw_class(&class("demo/Picker", Some("java/lang/Object"), &[], vec![pick]))
        .expect("picker");

    match hierarchy.resolve_all() {
        Err(Error::InvalidInstruction {
            method,
            index,
            error,
        }) => {
            assert_eq!(method, "demo/Picker.pick:(I)V");
            assert_eq!(index, 1);
            assert_eq!(
                error,
                InvalidInstruction::IllegalOperands {
                    instruction: InstructionKind::LookupSwitch,
                    reason: "keys must be sorted and distinct",
                }
            );
        }
        other => panic!("expected an invalid instruction, got {:?}", other),
    }
}

#[test]
fn renaming_a_group_renames_members_and_call_sites() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let hierarchy = Hierarchy::new(&arenas, Settings::new());

    let call_foo = |owner: &str| RawInstruction::Method {
        opcode: INVOKEVIRTUAL,
        owner: owner.to_owned(),
        name: String::from("foo"),
        descriptor: String::from("()V"),
        is_interface: false,
    };
    let mut caller = static_method("main", "(Ldemo/Leaf;Ldemo/Other;)V");
    caller.instructions = vec![
        RawInstruction::Var {
            opcode: ALOAD,
            index: 0,
        },
        call_foo("demo/Leaf"),
        RawInstruction::Var {
            opcode: ALOAD,
            index: 1,
        },
        call_foo("demo/Other"),
        RawInstruction::Insn { opcode: RETURN },
    ];

    hierarchy
        .add_raw_class(&class("demo/Main", Some("java/lang/Object"), &[], vec![caller]))
        .expect("main");
    hierarchy
        .add_raw_class(&class(
            "demo/Base",
            Some("java/lang/Object"),
            &[],
            vec![method("foo", "()V")],
        ))
        .expect("base");
    hierarchy
        .add_raw_class(&class("demo/Leaf", Some("demo/Base"), &[], vec![]))
        .expect("leaf");
    hierarchy.resolve_all().expect("resolution succeeds");

    let base_foo = lookup(&hierarchy, "demo/Base", "foo", "()V");
    let main = lookup(&hierarchy, "demo/Main", "main", "(Ldemo/Leaf;Ldemo/Other;)V");
    {
        let body = main.instructions();
        assert_eq!(body.owner(), Some(main));
        assert_eq!(body.len(), 5);
        match body.get(1) {
            Some(Instruction::Invoke(call)) => assert_eq!(call.target(), Some(base_foo)),
            other => panic!("expected a call, got {:?}", other),
        }
        match body.get(3) {
            Some(Instruction::Invoke(call)) => assert_eq!(call.target(), None),
            other => panic!("expected a call, got {:?}", other),
        }
    }

    let group = base_foo.group().expect("resolved");
    group.rename(UnqualifiedName::from_string(String::from("bar")).expect("name"));
    assert_eq!(base_foo.name().as_str(), "bar");
    assert_eq!(base_foo.declared_name().as_str(), "foo");

    let dumped = hierarchy.dump();
    assert_eq!(dumped[1].methods[0].name, "bar");
    let calls: Vec<&RawInstruction> = dumped[0].methods[0]
        .instructions
        .iter()
        .filter(|insn| matches!(insn, RawInstruction::Method { .. }))
        .collect();
    assert!(matches!(
        calls[0],
        RawInstruction::Method { name, owner, .. } if name == "bar" && owner == "demo/Leaf"
    ));
    assert!(matches!(calls[1], RawInstruction::Method { name, .. } if name == "foo"));

    let kinds: Vec<InstructionKind> = main.instructions().iter().map(Instruction::kind).collect();
    assert_eq!(kinds[4], InstructionKind::Simple);
}

#[test]
fn renaming_a_group_renames_method_handles() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let hierarchy = Hierarchy::new(&arenas, Settings::new());

    let run_handle = RawHandle {
        tag: 5,
        owner: String::from("demo/Task"),
        name: String::from("run"),
        descriptor: String::from("()V"),
        is_interface: false,
    };
    let mut external = run_handle.clone();
    external.owner = String::from("java/lang/Thread");
    let mut make = method("make", "()V");
    make.instructions = vec![
        RawInstruction::Ldc(RawConstant::Handle(run_handle)),
        RawInstruction::Insn { opcode: POP },
        RawInstruction::Ldc(RawConstant::Handle(external)),
        RawInstruction::Insn { opcode: POP },
        RawInstruction::Var {
            opcode: ALOAD,
            index: 0,
        },
        RawInstruction::Method {
            opcode: INVOKEVIRTUAL,
            owner: String::from("demo/Task"),
            name: String::from("run"),
            descriptor: String::from("()V"),
            is_interface: false,
        },
        RawInstruction::Insn { opcode: RETURN },
    ];

    hierarchy
        .add_raw_class(&class(
            "demo/Task",
            Some("java/lang/Object"),
            &[],
            vec![method("run", "()V"), make],
        ))
        .expect("task");
    hierarchy.resolve_all().expect("resolution succeeds");

    let run = lookup(&hierarchy, "demo/Task", "run", "()V");
    let make = lookup(&hierarchy, "demo/Task", "make", "()V");
    match make.instructions().get(0) {
        Some(Instruction::Ldc(ldc)) => match ldc.constant() {
            Constant::MethodHandle(handle) => assert_eq!(handle.target(), Some(run)),
            other => panic!("expected a method handle, got {:?}", other),
        },
        other => panic!("expected an ldc, got {:?}", other),
    }

    run.group()
        .expect("resolved")
        .rename(UnqualifiedName::from_string(String::from("execute")).expect("name"));

    let dumped = make.dump().instructions;
    match &dumped[0] {
        RawInstruction::Ldc(RawConstant::Handle(handle)) => {
            assert_eq!(handle.name, "execute");
            assert_eq!(handle.owner, "demo/Task");
        }
        other => panic!("expected a handle constant, got {:?}", other),
    }
    match &dumped[2] {
        RawInstruction::Ldc(RawConstant::Handle(handle)) => assert_eq!(handle.name, "run"),
        other => panic!("expected a handle constant, got {:?}", other),
    }
    assert!(matches!(&dumped[5], RawInstruction::Method { name, .. } if name == "execute"));
}

#[test]
fn instructions_can_be_rewritten_after_resolution() {
    init_logging();
    let arenas = HierarchyArenas::new();
    let hierarchy = Hierarchy::new(&arenas, Settings::new());
    let mut answer = static_method("answer", "()I");
    answer.instructions = vec![
        RawInstruction::Int {
            opcode: BIPUSH,
            operand: 42,
        },
        RawInstruction::Insn { opcode: IRETURN },
    ];
    hierarchy
        .add_raw_class(&class("demo/Answers", Some("java/lang/Object"), &[], vec![answer]))
        .expect("answers");

    let answer = lookup(&hierarchy, "demo/Answers", "answer", "()I");
    assert_eq!(answer.dump().instructions, answer.raw_instructions());
    hierarchy.resolve_all().expect("resolution succeeds");

    {
        let mut body = answer.instructions_mut();
        body.remove(1);
        body.visit_int(|builder| builder.operation(IntOperation::SiPush).operand(-1000))
            .expect("sipush");
        body.visit_simple(|builder| builder.opcode(IRETURN))
            .expect("ireturn");
    }

    assert_eq!(
        answer.dump().instructions,
        vec![
            RawInstruction::Int {
                opcode: BIPUSH,
                operand: 42,
            },
            RawInstruction::Int {
                opcode: SIPUSH,
                operand: -1000,
            },
            RawInstruction::Insn { opcode: IRETURN },
        ]
    );
}
